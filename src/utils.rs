/// Shared async helpers
use futures::future::join_all;
use std::future::Future;

/// Run `task` over `items` in consecutive batches of at most `batch_size`
///
/// Tasks within a batch run concurrently; the next batch starts only after
/// every task of the current one has finished. Results keep input order.
pub async fn run_in_batches<'a, T, R, F, Fut>(
    items: &'a [T],
    batch_size: usize,
    mut task: F,
) -> Vec<R>
where
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let mut results = Vec::with_capacity(items.len());

    for batch in items.chunks(batch_size.max(1)) {
        let futures: Vec<Fut> = batch.iter().map(&mut task).collect();
        results.extend(join_all(futures).await);
    }

    results
}

/// Shorten a 0x address for table output: `0x1234…abcd`
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}
