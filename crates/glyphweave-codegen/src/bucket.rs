//! Fixed-size, order-preserving partitioning of module jobs
//!
//! Bucket assignment decides which bucket file a component's named export
//! resolves to and which components share a deprecation warning store. It
//! must stay stable across rebuilds for an unchanged catalog order.

use crate::error::{Error, Result};
use crate::files::GENERATED_DIR;

/// Split `items` into contiguous slices of at most `capacity` elements
///
/// Every bucket but the last holds exactly `capacity` elements and there
/// are `ceil(len / capacity)` buckets.
pub fn partition<T>(items: &[T], capacity: usize) -> Result<Vec<&[T]>> {
    if capacity == 0 {
        return Err(Error::InvalidBucketSize);
    }
    Ok(items.chunks(capacity).collect())
}

/// Index of the bucket holding the job at `job_index`
pub fn bucket_index(job_index: usize, capacity: usize) -> usize {
    job_index / capacity
}

/// Virtual path of the aggregate file for bucket `index`
pub fn bucket_path(index: usize) -> String {
    format!("{}/bucket-{}.js", GENERATED_DIR, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 250, 0)]
    #[case(1, 250, 1)]
    #[case(249, 250, 1)]
    #[case(250, 250, 1)]
    #[case(251, 250, 2)]
    #[case(5000, 250, 20)]
    #[case(7, 3, 3)]
    #[case(7, 1, 7)]
    #[case(3, 10, 1)]
    fn test_partition_property(#[case] len: usize, #[case] capacity: usize, #[case] expected: usize) {
        let items: Vec<usize> = (0..len).collect();
        let buckets = partition(&items, capacity).unwrap();

        assert_eq!(buckets.len(), len.div_ceil(capacity));
        assert_eq!(buckets.len(), expected);

        if let Some((last, full)) = buckets.split_last() {
            assert!(full.iter().all(|b| b.len() == capacity));
            assert!(!last.is_empty() && last.len() <= capacity);
        }

        let total: usize = buckets.iter().map(|b| b.len()).sum();
        assert_eq!(total, len);

        let flattened: Vec<usize> = buckets.concat();
        assert_eq!(flattened, items);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let items = [1, 2, 3];
        assert!(matches!(partition(&items, 0), Err(Error::InvalidBucketSize)));
    }

    #[test]
    fn test_bucket_index_matches_partition() {
        let items: Vec<usize> = (0..1003).collect();
        let buckets = partition(&items, 250).unwrap();
        for (i, bucket) in buckets.iter().enumerate() {
            for item in bucket.iter() {
                assert_eq!(bucket_index(*item, 250), i);
            }
        }
    }

    #[test]
    fn test_bucket_path() {
        assert_eq!(bucket_path(0), "__generated__/bucket-0.js");
        assert_eq!(bucket_path(19), "__generated__/bucket-19.js");
    }
}
