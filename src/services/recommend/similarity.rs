use std::collections::{BTreeSet, HashMap};

use ndarray::{Array2, ArrayView1};

use crate::models::UserHistory;

/// Dense users × destinations table of experience ratings
///
/// Rows follow ascending user id and columns ascending destination id. A pair
/// with no recorded rating holds 0, the same value as an explicit 0 rating.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    user_ids: Vec<u32>,
    destination_ids: Vec<u32>,
    ratings: Array2<f64>,
}

impl RatingMatrix {
    /// Pivots history records into the rating table
    ///
    /// When a (user, destination) pair repeats, the last rating wins.
    pub fn from_history(records: &[UserHistory]) -> Self {
        let user_ids: Vec<u32> = records
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let destination_ids: Vec<u32> = records
            .iter()
            .map(|r| r.destination_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_rows: HashMap<u32, usize> =
            user_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let destination_cols: HashMap<u32, usize> = destination_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let mut ratings = Array2::zeros((user_ids.len(), destination_ids.len()));
        for record in records {
            let (Some(&row), Some(&col)) = (
                user_rows.get(&record.user_id),
                destination_cols.get(&record.destination_id),
            ) else {
                continue;
            };
            ratings[[row, col]] = record.rating;
        }

        Self {
            user_ids,
            destination_ids,
            ratings,
        }
    }

    /// Number of rows (distinct users)
    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    /// Number of columns (distinct destinations)
    pub fn destination_count(&self) -> usize {
        self.destination_ids.len()
    }

    /// User id of each row, ascending
    pub fn user_ids(&self) -> &[u32] {
        &self.user_ids
    }

    /// Destination id of each column, ascending
    pub fn destination_ids(&self) -> &[u32] {
        &self.destination_ids
    }

    /// Ratings of one user, or `None` past the last row
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.user_count()).then(|| self.ratings.row(index))
    }

    /// Rating at a row/column position
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.ratings.get([row, col]).copied()
    }
}

/// Cosine similarity of two rating vectors
///
/// A zero-norm vector has no direction, so its similarity to anything is 0.
/// The same holds when the ratio is not a finite number.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = a.dot(&b) / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Square user × user cosine similarity table, indexed by rating-matrix row
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Computes every pairwise row similarity of the rating table
    ///
    /// Only the upper triangle is computed and mirrored, so the result is
    /// exactly symmetric. The diagonal is pinned to 1, zero rows included.
    pub fn from_ratings(ratings: &RatingMatrix) -> Self {
        let n = ratings.user_count();
        let mut values = Array2::zeros((n, n));

        for i in 0..n {
            values[[i, i]] = 1.0;
            let row_i = ratings.ratings.row(i);
            for j in (i + 1)..n {
                let similarity = cosine_similarity(row_i, ratings.ratings.row(j));
                values[[i, j]] = similarity;
                values[[j, i]] = similarity;
            }
        }

        tracing::debug!(users = n, "Similarity matrix computed");

        Self { values }
    }

    /// Side length of the matrix
    pub fn dimension(&self) -> usize {
        self.values.nrows()
    }

    /// Similarities of one user to every user, or `None` past the last row
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.dimension()).then(|| self.values.row(index))
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get([i, j]).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn record(user_id: u32, destination_id: u32, rating: f64) -> UserHistory {
        UserHistory {
            user_id,
            destination_id,
            rating,
        }
    }

    fn sample_history() -> Vec<UserHistory> {
        vec![
            record(2, 10, 4.0),
            record(1, 10, 5.0),
            record(1, 30, 3.0),
            record(3, 20, 2.0),
            record(2, 20, 1.0),
            record(4, 30, 5.0),
        ]
    }

    #[test]
    fn test_pivot_orders_rows_and_columns() {
        let matrix = RatingMatrix::from_history(&sample_history());

        assert_eq!(matrix.user_ids(), &[1, 2, 3, 4]);
        assert_eq!(matrix.destination_ids(), &[10, 20, 30]);
        assert_eq!(matrix.row(0).unwrap().to_vec(), vec![5.0, 0.0, 3.0]);
        assert_eq!(matrix.row(1).unwrap().to_vec(), vec![4.0, 1.0, 0.0]);
        assert!(matrix.row(4).is_none());
    }

    #[test]
    fn test_pivot_keeps_last_duplicate_rating() {
        let matrix =
            RatingMatrix::from_history(&[record(1, 10, 2.0), record(1, 10, 4.0)]);
        assert_eq!(matrix.get(0, 0), Some(4.0));
    }

    #[test]
    fn test_empty_history_builds_empty_matrices() {
        let ratings = RatingMatrix::from_history(&[]);
        let similarity = SimilarityMatrix::from_ratings(&ratings);
        assert_eq!(ratings.user_count(), 0);
        assert_eq!(similarity.dimension(), 0);
        assert!(similarity.row(0).is_none());
    }

    #[test]
    fn test_cosine_similarity_values() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 1.0];
        let c = array![2.0, 0.0];
        let zero = array![0.0, 0.0];

        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
        assert!((cosine_similarity(a.view(), c.view()) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(zero.view(), zero.view()), 0.0);
        assert_eq!(cosine_similarity(a.view(), zero.view()), 0.0);
    }

    #[test]
    fn test_non_finite_ratings_never_leak_into_similarity() {
        let ratings = RatingMatrix::from_history(&[
            record(1, 1, f64::NAN),
            record(2, 1, 4.0),
            record(3, 1, 5.0),
            record(4, 1, f64::INFINITY),
        ]);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        for i in 0..4 {
            for j in 0..4 {
                assert!(similarity.get(i, j).unwrap().is_finite());
            }
        }
        assert_eq!(similarity.get(0, 1), Some(0.0));
        assert_eq!(similarity.get(1, 2), Some(1.0));
    }

    #[test]
    fn test_similarity_diagonal_is_exactly_one() {
        let mut history = sample_history();
        history.push(record(5, 10, 0.0));
        let ratings = RatingMatrix::from_history(&history);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        for i in 0..similarity.dimension() {
            assert_eq!(similarity.get(i, i), Some(1.0));
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let ratings = RatingMatrix::from_history(&sample_history());
        let similarity = SimilarityMatrix::from_ratings(&ratings);
        let n = similarity.dimension();

        for i in 0..n {
            for j in 0..n {
                assert_eq!(similarity.get(i, j), similarity.get(j, i));
            }
        }
    }

    #[test]
    fn test_zero_row_has_zero_similarity_to_others() {
        let mut history = sample_history();
        history.push(record(5, 10, 0.0));
        let ratings = RatingMatrix::from_history(&history);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        for j in 0..4 {
            let value = similarity.get(4, j).unwrap();
            assert_eq!(value, 0.0);
            assert!(!value.is_nan());
        }
    }
}
