use crate::models::currency::{is_native, is_stable_token};
use crate::models::{ContractAddresses, Transfer, ZERO_ADDRESS};

/// The value transfers of one transaction. Fixed after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferCollection {
    transfers: Vec<Transfer>,
}

impl TransferCollection {
    pub fn new(transfers: Vec<Transfer>) -> Self {
        Self { transfers }
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transfer> {
        self.transfers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter()
    }

    pub fn get_transfer_from(&self, address: &str) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.from_address_hash == address)
    }

    pub fn get_transfer_to(&self, address: &str) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.to_address_hash == address)
    }

    pub fn contains_transfer_from(&self, address: &str) -> bool {
        self.get_transfer_from(address).is_some()
    }

    pub fn contains_transfer_to(&self, address: &str) -> bool {
        self.get_transfer_to(address).is_some()
    }

    /// First transfer issued by a minting authority of its token.
    pub fn get_minted_token_transfer(&self, authorities: &MintingAuthorities<'_>) -> Option<&Transfer> {
        self.transfers.iter().find(|t| authorities.is_minter_of(&t.token, &t.from_address_hash))
    }

    pub fn contains_minted_token_transfer(&self, authorities: &MintingAuthorities<'_>) -> bool {
        self.get_minted_token_transfer(authorities).is_some()
    }
}

/// Native tokens are released by the Reserve contract, stable tokens are minted from the zero address.
#[derive(Debug, Clone, Copy)]
pub struct MintingAuthorities<'a> {
    reserve: &'a str,
}

impl<'a> MintingAuthorities<'a> {
    pub fn new(contracts: &'a ContractAddresses) -> Self {
        Self {
            reserve: &contracts.reserve,
        }
    }

    pub fn is_minter_of(&self, token: &str, from: &str) -> bool {
        (is_native(token) && from == self.reserve) || (is_stable_token(token) && from == ZERO_ADDRESS)
    }
}

/// Semantic predicates over one transaction's transfers.
pub struct TransfersNavigator<'a> {
    transfers: &'a TransferCollection,
    contracts: &'a ContractAddresses,
    faucet_address: Option<&'a str>,
    user_address: &'a str,
}

impl<'a> TransfersNavigator<'a> {
    pub fn new(
        transfers: &'a TransferCollection,
        contracts: &'a ContractAddresses,
        faucet_address: Option<&'a str>,
        user_address: &'a str,
    ) -> Self {
        Self {
            transfers,
            contracts,
            faucet_address,
            user_address,
        }
    }

    fn single(&self) -> Option<&'a Transfer> {
        if self.transfers.len() == 1 { self.transfers.get(0) } else { None }
    }

    fn minting_authorities(&self) -> MintingAuthorities<'a> {
        MintingAuthorities::new(self.contracts)
    }

    pub fn attestation_fee_transfer(&self) -> Option<&'a Transfer> {
        self.transfers.get_transfer_to(&self.contracts.attestations)
    }

    pub fn escrow_sent_transfer(&self) -> Option<&'a Transfer> {
        self.transfers.get_transfer_to(&self.contracts.escrow)
    }

    pub fn sent_transfer(&self) -> Option<&'a Transfer> {
        self.single().filter(|t| t.from_address_hash == self.user_address)
    }

    pub fn received_transfer(&self) -> Option<&'a Transfer> {
        self.single().filter(|t| t.to_address_hash == self.user_address)
    }

    pub fn faucet_transfer(&self) -> Option<&'a Transfer> {
        self.faucet_address
            .and_then(|faucet| self.transfers.get_transfer_from(faucet))
    }

    /// A single transfer paid out of Escrow straight to an externally owned account.
    pub fn is_escrow_received_to_eoa(&self) -> bool {
        self.single().is_some_and(|t| {
            t.from_address_hash == self.contracts.escrow && !self.contracts.is_registered(&t.to_address_hash)
        })
    }

    /// An Escrow payout that lands in a forwarding wallet which then moves it on.
    ///
    /// This is a heuristic: the second leg must start where the first ended and
    /// end at its own source.
    pub fn is_forwarded_escrow_payout(&self) -> bool {
        match (self.transfers.len(), self.transfers.get(0), self.transfers.get(1)) {
            (2, Some(first), Some(second)) => {
                first.from_address_hash == self.contracts.escrow
                    && second.from_address_hash == first.to_address_hash
                    && second.to_address_hash == second.from_address_hash
            },
            _ => false,
        }
    }

    /// The transfer paid out of Escrow, if this is an escrow payout of either shape.
    pub fn escrow_received_transfer(&self) -> Option<&'a Transfer> {
        if self.is_escrow_received_to_eoa() || self.is_forwarded_escrow_payout() {
            self.transfers.get(0)
        } else {
            None
        }
    }

    /// `(in, out)` legs of a native token sale against a freshly minted stable token.
    pub fn exchange_celo_to_token(&self) -> Option<(&'a Transfer, &'a Transfer)> {
        if self.transfers.len() != 2 {
            return None;
        }
        let celo_in = self
            .transfers
            .iter()
            .find(|t| is_native(&t.token) && t.to_address_hash == self.contracts.reserve)?;
        let token_out = self
            .transfers
            .get_minted_token_transfer(&self.minting_authorities())
            .filter(|t| is_stable_token(&t.token))?;
        Some((celo_in, token_out))
    }

    /// `(in, out)` legs of a stable token sale against native token released by Reserve.
    pub fn exchange_token_to_celo(&self) -> Option<(&'a Transfer, &'a Transfer)> {
        if self.transfers.len() != 2 {
            return None;
        }
        let celo_out = self
            .transfers
            .get_minted_token_transfer(&self.minting_authorities())
            .filter(|t| is_native(&t.token))?;
        let token_in = self
            .transfers
            .iter()
            .find(|t| is_stable_token(&t.token) && *t != celo_out)?;
        Some((token_in, celo_out))
    }

    pub fn is_exchange_celo_to_token(&self) -> bool {
        self.exchange_celo_to_token().is_some()
    }

    pub fn is_exchange_token_to_celo(&self) -> bool {
        self.exchange_token_to_celo().is_some()
    }
}
