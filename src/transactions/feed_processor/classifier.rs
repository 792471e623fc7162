use rayon::prelude::*;

use super::rules::{ClassificationContext, RULES, TransactionKind};
use super::transaction::Transaction;

/// A transaction paired with the first rule it matched.
#[derive(Debug, Clone)]
pub struct ClassifiedTransaction {
    pub transaction: Transaction,
    pub kind: TransactionKind,
}

/// Returns the first matching rule. Total: the last rule always matches.
pub fn classify(transaction: &Transaction, context: &ClassificationContext<'_>) -> TransactionKind {
    RULES
        .iter()
        .find(|rule| (rule.matches)(transaction, context))
        .map(|rule| rule.kind)
        .unwrap_or(TransactionKind::Unclassified)
}

/// Classifies a batch in parallel. The output keeps the input order.
pub fn classify_all(transactions: Vec<Transaction>, context: &ClassificationContext<'_>) -> Vec<ClassifiedTransaction> {
    transactions
        .into_par_iter()
        .map(|transaction| {
            let kind = classify(&transaction, context);
            ClassifiedTransaction { transaction, kind }
        })
        .collect()
}
