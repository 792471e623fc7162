use alloy_primitives::keccak256;

use crate::models::{ContractAddresses, ContractRole};

/// Call data of a transaction together with the address it was sent to.
///
/// Only the call target and the 4-byte method selector are inspected,
/// arguments are never decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    data: Vec<u8>,
    target: Option<String>,
}

impl Input {
    /// Decode hex call data. An empty string or bare `0x` means "no call".
    pub fn from_string(input: &str) -> Result<Self, hex::FromHexError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        Ok(Self {
            data: hex::decode(digits)?,
            target: None,
        })
    }

    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target.map(|t| t.to_lowercase());
        self
    }

    pub fn has_call(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn method_id(&self) -> Option<[u8; 4]> {
        let selector = self.data.get(..4)?;
        let mut id = [0u8; 4];
        id.copy_from_slice(selector);
        Some(id)
    }

    /// True iff this is a call whose target is the registered address for `role`.
    pub fn has_contract_call_to(&self, contracts: &ContractAddresses, role: ContractRole) -> bool {
        match (self.has_call(), self.target(), contracts.address_of(role)) {
            (true, Some(target), Some(address)) => target == address,
            _ => false,
        }
    }

    /// True iff this is a call to any registered contract.
    pub fn has_call_to_registered_contract(&self, contracts: &ContractAddresses) -> bool {
        self.has_call() && self.target().is_some_and(|target| contracts.is_registered(target))
    }

    pub fn is_call_to(&self, signature: &str) -> bool {
        self.method_id() == Some(method_selector(signature))
    }
}

/// First four bytes of the keccak-256 hash of a method signature.
pub fn method_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes()).0;
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contracts() -> ContractAddresses {
        ContractAddresses {
            attestations: "0xa1".to_string(),
            escrow: "0xe1".to_string(),
            exchange: "0xe2".to_string(),
            exchange_eur: None,
            governance: "0x90".to_string(),
            reserve: "0x5e".to_string(),
            accounts: Some("0xac".to_string()),
        }
    }

    #[test]
    fn test_empty_input_is_not_a_call() {
        for raw in ["", "0x"] {
            let input = Input::from_string(raw).unwrap().with_target(Some("0xE2".to_string()));
            assert!(!input.has_call());
            assert_eq!(input.method_id(), None);
            assert!(!input.has_contract_call_to(&contracts(), ContractRole::Exchange));
        }
    }

    #[test]
    fn test_call_target_matches_role() {
        let input = Input::from_string("0xa9059cbb00000000")
            .unwrap()
            .with_target(Some("0xE2".to_string()));
        assert!(input.has_contract_call_to(&contracts(), ContractRole::Exchange));
        assert!(!input.has_contract_call_to(&contracts(), ContractRole::Escrow));
        assert!(!input.has_contract_call_to(&contracts(), ContractRole::ExchangeEUR));
        assert!(input.has_call_to_registered_contract(&contracts()));
    }

    #[test]
    fn test_method_selector() {
        assert_eq!(method_selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        let input = Input::from_string("a9059cbb").unwrap();
        assert!(input.is_call_to("transfer(address,uint256)"));
        assert!(!input.is_call_to("approve(address,uint256)"));
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        assert!(Input::from_string("0xzz").is_err());
        assert!(Input::from_string("0xabc").is_err());
    }
}
