//! The ordered decision list used to classify transactions.
//!
//! Each [`TransactionRule`] pairs a predicate with an event builder. Rules are
//! evaluated in the order of [`RULES`] and the first match wins, so the order
//! of the table is part of its meaning. The final rule matches everything.

use super::builder::EventBuilder;
use super::error::ClassificationError;
use super::transaction::Transaction;
use super::transfers::TransfersNavigator;
use super::types::{Event, EventType};
use crate::models::{ContractAddresses, ContractRole};

/// Method registering an account's data encryption key on the Accounts contract.
pub const REGISTER_DEK_METHOD: &str = "setAccountDataEncryptionKey(bytes)";

/// Everything the rules need to know besides the transaction itself.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    pub contracts: &'a ContractAddresses,
    pub faucet_address: Option<&'a str>,
    /// Lowercased address the feed is built for.
    pub user_address: &'a str,
    pub tokens_of_interest: &'a [String],
}

impl ClassificationContext<'_> {
    pub fn navigator<'t>(&'t self, transaction: &'t Transaction) -> TransfersNavigator<'t> {
        TransfersNavigator::new(
            &transaction.transfers,
            self.contracts,
            self.faucet_address,
            self.user_address,
        )
    }
}

/// Variants are declared in priority order; the discriminant indexes [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    ExchangeContractCall,
    EscrowContractCall,
    RegisterAccountDekContractCall,
    ContractCall,
    Verification,
    EscrowSent,
    TokenSent,
    Faucet,
    EscrowReceived,
    TokenReceived,
    ExchangeCeloToToken,
    ExchangeTokenToCelo,
    Unclassified,
}

impl TransactionKind {
    pub fn rule(self) -> &'static TransactionRule {
        &RULES[self as usize]
    }

    pub fn is_aggregatable(self) -> bool {
        self.rule().aggregatable
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExchangeContractCall => "exchange_contract_call",
            Self::EscrowContractCall => "escrow_contract_call",
            Self::RegisterAccountDekContractCall => "register_account_dek_contract_call",
            Self::ContractCall => "contract_call",
            Self::Verification => "verification",
            Self::EscrowSent => "escrow_sent",
            Self::TokenSent => "token_sent",
            Self::Faucet => "faucet",
            Self::EscrowReceived => "escrow_received",
            Self::TokenReceived => "token_received",
            Self::ExchangeCeloToToken => "exchange_celo_to_token",
            Self::ExchangeTokenToCelo => "exchange_token_to_celo",
            Self::Unclassified => "unclassified",
        }
    }
}

type MatchFn = fn(&Transaction, &ClassificationContext<'_>) -> bool;
type BuildFn = fn(&EventBuilder<'_>, &Transaction, &ClassificationContext<'_>) -> Result<Option<Event>, ClassificationError>;

pub struct TransactionRule {
    pub kind: TransactionKind,
    /// Bare call legs that merge into the following entry.
    pub aggregatable: bool,
    pub matches: MatchFn,
    pub build: BuildFn,
}

pub static RULES: [TransactionRule; 13] = [
    TransactionRule {
        kind: TransactionKind::ExchangeContractCall,
        aggregatable: true,
        matches: |tx, ctx| {
            tx.transfers.is_empty()
                && (tx.input.has_contract_call_to(ctx.contracts, ContractRole::Exchange)
                    || tx.input.has_contract_call_to(ctx.contracts, ContractRole::ExchangeEUR))
        },
        build: call_leg,
    },
    TransactionRule {
        kind: TransactionKind::EscrowContractCall,
        aggregatable: true,
        matches: |tx, ctx| tx.transfers.is_empty() && tx.input.has_contract_call_to(ctx.contracts, ContractRole::Escrow),
        build: call_leg,
    },
    TransactionRule {
        kind: TransactionKind::RegisterAccountDekContractCall,
        aggregatable: true,
        matches: |tx, ctx| {
            tx.transfers.is_empty()
                && tx.input.has_contract_call_to(ctx.contracts, ContractRole::Accounts)
                && tx.input.is_call_to(REGISTER_DEK_METHOD)
        },
        build: call_leg,
    },
    TransactionRule {
        kind: TransactionKind::ContractCall,
        aggregatable: true,
        matches: |tx, ctx| tx.transfers.is_empty() && tx.input.has_call_to_registered_contract(ctx.contracts),
        build: call_leg,
    },
    TransactionRule {
        kind: TransactionKind::Verification,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).attestation_fee_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .attestation_fee_transfer()
                .ok_or(ClassificationError::MissingTransfer("attestation fee"))?;
            builder
                .transfer_event(
                    tx,
                    transfer,
                    EventType::VerificationFee,
                    &ctx.contracts.attestations,
                    None,
                    &tx.fees,
                )
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::EscrowSent,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).escrow_sent_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .escrow_sent_transfer()
                .ok_or(ClassificationError::MissingTransfer("escrow deposit"))?;
            builder
                .transfer_event(tx, transfer, EventType::EscrowSent, &ctx.contracts.escrow, None, &tx.fees)
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::TokenSent,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).sent_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .sent_transfer()
                .ok_or(ClassificationError::MissingTransfer("outgoing transfer"))?;
            builder
                .transfer_event(
                    tx,
                    transfer,
                    EventType::Sent,
                    &transfer.to_address_hash,
                    transfer.to_account_hash.as_deref(),
                    &tx.fees,
                )
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::Faucet,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).faucet_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .faucet_transfer()
                .ok_or(ClassificationError::MissingTransfer("faucet payout"))?;
            builder
                .transfer_event(tx, transfer, EventType::Faucet, &transfer.from_address_hash, None, &[])
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::EscrowReceived,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).escrow_received_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .escrow_received_transfer()
                .ok_or(ClassificationError::MissingTransfer("escrow payout"))?;
            builder
                .transfer_event(tx, transfer, EventType::EscrowReceived, &ctx.contracts.escrow, None, &[])
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::TokenReceived,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).received_transfer().is_some(),
        build: |builder, tx, ctx| {
            let transfer = ctx
                .navigator(tx)
                .received_transfer()
                .ok_or(ClassificationError::MissingTransfer("incoming transfer"))?;
            builder
                .transfer_event(
                    tx,
                    transfer,
                    EventType::Received,
                    &transfer.from_address_hash,
                    transfer.from_account_hash.as_deref(),
                    &[],
                )
                .map(Some)
        },
    },
    TransactionRule {
        kind: TransactionKind::ExchangeCeloToToken,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).is_exchange_celo_to_token(),
        build: |builder, tx, ctx| {
            let (celo_in, token_out) = ctx
                .navigator(tx)
                .exchange_celo_to_token()
                .ok_or(ClassificationError::MissingTransfer("exchange legs"))?;
            builder.exchange_event(tx, celo_in, token_out, ctx.tokens_of_interest, &tx.fees)
        },
    },
    TransactionRule {
        kind: TransactionKind::ExchangeTokenToCelo,
        aggregatable: false,
        matches: |tx, ctx| ctx.navigator(tx).is_exchange_token_to_celo(),
        build: |builder, tx, ctx| {
            let (token_in, celo_out) = ctx
                .navigator(tx)
                .exchange_token_to_celo()
                .ok_or(ClassificationError::MissingTransfer("exchange legs"))?;
            builder.exchange_event(tx, token_in, celo_out, ctx.tokens_of_interest, &tx.fees)
        },
    },
    TransactionRule {
        kind: TransactionKind::Unclassified,
        aggregatable: false,
        matches: |_, _| true,
        build: |_, _, _| Err(ClassificationError::UnknownTransactionType),
    },
];

/// Call legs carry no value of their own; they only contribute fees to the next entry.
fn call_leg(
    _builder: &EventBuilder<'_>,
    _transaction: &Transaction,
    _context: &ClassificationContext<'_>,
) -> Result<Option<Event>, ClassificationError> {
    Ok(None)
}
