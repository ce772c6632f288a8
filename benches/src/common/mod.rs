use std::sync::Arc;

use ingest::prelude::*;

/// Generate a `key:value;...` dataset
///
/// Transaction ids are sequential, clients cycle through `num_clients`
/// documents, and every `invalid_every`-th line (when non-zero) drops its
/// document so it is rejected by the parser.
pub fn generate_dataset(num_lines: usize, num_clients: usize, invalid_every: usize) -> Vec<u8> {
    let mut out = String::with_capacity(num_lines * 64);

    for i in 1..=num_lines {
        let client = i % num_clients.max(1);
        let day = i % 28 + 1;
        let amount = (i * 37) % 100_000;

        if invalid_every > 0 && i % invalid_every == 0 {
            out.push_str(&format!("id:{i};nome:Client {client};data:2024-01-{day:02};valor:{amount}\n"));
        } else {
            out.push_str(&format!(
                "id:{i};nome:Client {client};cpfCnpj:{:011};data:2024-01-{day:02};valor:{amount}\n",
                client
            ));
        }
    }

    out.into_bytes()
}

/// Fresh in-memory store pair
pub fn setup_stores() -> (Arc<ConcurrentClientStore>, Arc<ConcurrentTransactionStore>) {
    let clients = Arc::new(ConcurrentClientStore::new());
    let transactions = Arc::new(ConcurrentTransactionStore::new(clients.clone()));
    (clients, transactions)
}
