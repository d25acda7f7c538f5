// Forget batch planning
//
// Contiguous, order-preserving chunks. No dedup, no reordering, and an
// empty candidate list yields no batches at all.

use std::num::NonZeroUsize;

/// Largest MAC list sent in one `forget-sta` call.
pub const FORGET_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(n) => n,
    None => unreachable!(),
};

/// One bounded, ordered slice of the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclamationBatch {
    /// Offset of the first MAC in the full candidate list.
    pub offset: usize,
    pub macs: Vec<String>,
}

impl ReclamationBatch {
    pub fn len(&self) -> usize {
        self.macs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macs.is_empty()
    }
}

/// Split `ids` into chunks of at most `batch_size`.
///
/// Chunk `k` holds `ids[k * batch_size .. min((k + 1) * batch_size, n)]`.
pub fn plan(ids: &[String], batch_size: NonZeroUsize) -> Vec<ReclamationBatch> {
    ids.chunks(batch_size.get())
        .enumerate()
        .map(|(k, chunk)| ReclamationBatch {
            offset: k * batch_size.get(),
            macs: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("id-{i}")).collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(plan(&[], FORGET_BATCH_SIZE).is_empty());
    }

    #[test]
    fn fifty_three_in_twenty_fives() {
        let batches = plan(&ids(53), FORGET_BATCH_SIZE);
        let sizes: Vec<usize> = batches.iter().map(ReclamationBatch::len).collect();
        assert_eq!(sizes, vec![25, 25, 3]);
        assert_eq!(batches[2].offset, 50);
        assert_eq!(batches[2].macs, vec!["id-50", "id-51", "id-52"]);
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let sizes: Vec<usize> = plan(&ids(50), FORGET_BATCH_SIZE)
            .iter()
            .map(ReclamationBatch::len)
            .collect();
        assert_eq!(sizes, vec![25, 25]);
    }

    #[test]
    fn duplicates_are_kept() {
        let input = vec!["a".to_owned(), "a".to_owned(), "b".to_owned()];
        let batches = plan(&input, size(2));
        assert_eq!(batches[0].macs, vec!["a", "a"]);
        assert_eq!(batches[1].macs, vec!["b"]);
    }

    #[test]
    fn batch_count_sizes_and_order_hold_for_all_shapes() {
        for n in 0..=80 {
            let input = ids(n);
            for b in 1..=30 {
                let batches = plan(&input, size(b));

                assert_eq!(batches.len(), n.div_ceil(b), "n={n} b={b}");
                if let Some((last, full)) = batches.split_last() {
                    assert!(full.iter().all(|c| c.len() == b), "n={n} b={b}");
                    assert!(!last.is_empty() && last.len() <= b, "n={n} b={b}");
                }

                let rejoined: Vec<String> =
                    batches.into_iter().flat_map(|c| c.macs).collect();
                assert_eq!(rejoined, input, "n={n} b={b}");
            }
        }
    }
}
