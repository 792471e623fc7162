use log::debug;

use super::classifier::ClassifiedTransaction;
use super::rules::TransactionKind;
use super::types::{Fee, FeeType};

/// Folds bare contract-call legs into the entry that follows them.
///
/// Pairing is purely positional: a call leg merges with the next entry in
/// fetch order, whatever that entry is. A call leg with no successor is
/// dropped.
#[derive(Debug, Default)]
pub struct TransactionAggregator;

impl TransactionAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, classified: Vec<ClassifiedTransaction>) -> Vec<ClassifiedTransaction> {
        let mut result = Vec::with_capacity(classified.len());
        let mut carried: Vec<Fee> = Vec::new();
        let mut pending_legs = 0usize;

        for entry in classified {
            if entry.kind.is_aggregatable() {
                let mut fees = self.carried_fees(entry);
                fees.append(&mut carried);
                carried = fees;
                pending_legs += 1;
                continue;
            }

            let mut entry = entry;
            entry.transaction.fees.append(&mut carried);
            pending_legs = 0;
            result.push(entry);
        }

        if pending_legs > 0 {
            debug!(
                count = pending_legs;
                "Dropping trailing contract call legs with no following transaction"
            );
        }

        result
    }

    fn carried_fees(&self, leg: ClassifiedTransaction) -> Vec<Fee> {
        let retype = leg.kind == TransactionKind::RegisterAccountDekContractCall;
        leg.transaction
            .fees
            .into_iter()
            .map(|fee| {
                if retype {
                    Fee {
                        fee_type: FeeType::OneTimeEncryptionFee,
                        ..fee
                    }
                } else {
                    fee
                }
            })
            .collect()
    }
}
