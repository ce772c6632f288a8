use std::mem;

use crate::domain::ClientUpsert;
use crate::io::ValidatedTransaction;

/// Transaction candidate whose client reference is still the natural key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub transaction_id: String,
    pub document: String,
    pub date: String,
    pub amount: String,
}

/// Group of candidates reconciled and written together
///
/// `clients[i]` and `transactions[i]` come from the same input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Dispatch order, starting at 0
    pub sequence: usize,
    pub clients: Vec<ClientUpsert>,
    pub transactions: Vec<PendingTransaction>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Buffers validated lines until the batch size is reached
#[derive(Debug)]
pub struct BatchAccumulator {
    batch_size: usize,
    next_sequence: usize,
    clients: Vec<ClientUpsert>,
    transactions: Vec<PendingTransaction>,
}

impl BatchAccumulator {
    /// Reference default batch size
    pub const DEFAULT_BATCH_SIZE: usize = 100_000;

    /// Create an accumulator; a batch size of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            next_sequence: 0,
            clients: Vec::with_capacity(batch_size.min(4096)),
            transactions: Vec::with_capacity(batch_size.min(4096)),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of buffered lines
    pub fn pending(&self) -> usize {
        self.transactions.len()
    }

    /// Buffer one line; returns the full batch when the threshold is reached
    pub fn push(&mut self, record: ValidatedTransaction) -> Option<Batch> {
        let ValidatedTransaction {
            id,
            name,
            document,
            date,
            amount,
        } = record;

        self.clients.push(ClientUpsert {
            name,
            document: document.clone(),
        });
        self.transactions.push(PendingTransaction {
            transaction_id: id,
            document,
            date,
            amount,
        });

        if self.transactions.len() >= self.batch_size {
            Some(self.take())
        } else {
            None
        }
    }

    /// Flush the remainder as a final, possibly smaller, batch
    pub fn finish(&mut self) -> Option<Batch> {
        if self.transactions.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> Batch {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Batch {
            sequence,
            clients: mem::take(&mut self.clients),
            transactions: mem::take(&mut self.transactions),
        }
    }
}

impl Default for BatchAccumulator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATCH_SIZE)
    }
}
