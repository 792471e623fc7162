use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContractRole {
    Accounts,
    Attestations,
    Escrow,
    Exchange,
    ExchangeEUR,
    Governance,
    Reserve,
}

impl ContractRole {
    /// Roles that must resolve before any transaction can be classified.
    pub const REQUIRED: [ContractRole; 5] = [
        ContractRole::Attestations,
        ContractRole::Escrow,
        ContractRole::Exchange,
        ContractRole::Governance,
        ContractRole::Reserve,
    ];
}

impl std::fmt::Display for ContractRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractRole::Accounts => write!(f, "Accounts"),
            ContractRole::Attestations => write!(f, "Attestations"),
            ContractRole::Escrow => write!(f, "Escrow"),
            ContractRole::Exchange => write!(f, "Exchange"),
            ContractRole::ExchangeEUR => write!(f, "ExchangeEUR"),
            ContractRole::Governance => write!(f, "Governance"),
            ContractRole::Reserve => write!(f, "Reserve"),
        }
    }
}

impl FromStr for ContractRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accounts" => Ok(ContractRole::Accounts),
            "Attestations" => Ok(ContractRole::Attestations),
            "Escrow" => Ok(ContractRole::Escrow),
            "Exchange" => Ok(ContractRole::Exchange),
            "ExchangeEUR" => Ok(ContractRole::ExchangeEUR),
            "Governance" => Ok(ContractRole::Governance),
            "Reserve" => Ok(ContractRole::Reserve),
            _ => Err(format!("Invalid ContractRole: {}", s)),
        }
    }
}

/// Lowercased addresses of the core contracts, keyed by role.
///
/// Instances are only produced by the registry after every role in
/// [`ContractRole::REQUIRED`] resolved, so the required accessors never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    pub attestations: String,
    pub escrow: String,
    pub exchange: String,
    pub exchange_eur: Option<String>,
    pub governance: String,
    pub reserve: String,
    pub accounts: Option<String>,
}

impl ContractAddresses {
    pub fn address_of(&self, role: ContractRole) -> Option<&str> {
        match role {
            ContractRole::Accounts => self.accounts.as_deref(),
            ContractRole::Attestations => Some(&self.attestations),
            ContractRole::Escrow => Some(&self.escrow),
            ContractRole::Exchange => Some(&self.exchange),
            ContractRole::ExchangeEUR => self.exchange_eur.as_deref(),
            ContractRole::Governance => Some(&self.governance),
            ContractRole::Reserve => Some(&self.reserve),
        }
    }

    /// Returns the role registered at `address`, if any.
    pub fn role_of(&self, address: &str) -> Option<ContractRole> {
        [
            ContractRole::Accounts,
            ContractRole::Attestations,
            ContractRole::Escrow,
            ContractRole::Exchange,
            ContractRole::ExchangeEUR,
            ContractRole::Governance,
            ContractRole::Reserve,
        ]
        .into_iter()
        .find(|role| self.address_of(*role) == Some(address))
    }

    pub fn is_registered(&self, address: &str) -> bool {
        self.role_of(address).is_some()
    }
}
