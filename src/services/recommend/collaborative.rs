use crate::models::Destination;

use super::{
    loader::DestinationTable,
    similarity::{RatingMatrix, SimilarityMatrix},
    RecommendError, RecommendParams,
};

/// Picks the `k` rows most similar to `target`, most similar first
///
/// The target itself is never a candidate. Equal similarities keep ascending
/// row order. Fewer than `k` rows are returned when fewer exist.
pub fn nearest_neighbours(similarities: &[f64], target: usize, k: usize) -> Vec<usize> {
    let mut candidates: Vec<(usize, f64)> = similarities
        .iter()
        .copied()
        .enumerate()
        .filter(|(row, _)| *row != target)
        .collect();

    // `sort_by` is stable, so ties stay in row order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(k);
    candidates.into_iter().map(|(row, _)| row).collect()
}

/// Ranks destinations by the mean rating the neighbours gave them
///
/// Returns up to `limit` destination ids, best first. Equal means keep
/// ascending destination id order.
pub fn rank_destinations(neighbours: &[usize], ratings: &RatingMatrix, limit: usize) -> Vec<u32> {
    if neighbours.is_empty() {
        return Vec::new();
    }

    let count = neighbours.len() as f64;
    let mut scored: Vec<(u32, f64)> = ratings
        .destination_ids()
        .iter()
        .enumerate()
        .map(|(col, &destination_id)| {
            let total: f64 = neighbours
                .iter()
                .filter_map(|&row| ratings.get(row, col))
                .sum();
            (destination_id, total / count)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(id, _)| id).collect()
}

/// Recommends destinations liked by the users most similar to `user_id`
///
/// User ids are 1-based positions into the rating matrix rows. The result
/// keeps the ranking order; ranked ids missing from the reference table are
/// skipped.
pub fn collaborative_recommend(
    user_id: i64,
    similarity: &SimilarityMatrix,
    ratings: &RatingMatrix,
    destinations: &DestinationTable,
    params: RecommendParams,
) -> Result<Vec<Destination>, RecommendError> {
    let unknown = || RecommendError::UnknownUser {
        user_id,
        known_users: similarity.dimension(),
    };
    let row = usize::try_from(user_id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .ok_or_else(unknown)?;
    let similarities = similarity.row(row).ok_or_else(unknown)?.to_vec();

    let neighbours = nearest_neighbours(&similarities, row, params.neighbours);
    if neighbours.len() < params.neighbours {
        tracing::debug!(
            user_id,
            available = neighbours.len(),
            wanted = params.neighbours,
            "Fewer neighbours than requested"
        );
    }

    let ranked = rank_destinations(&neighbours, ratings, params.limit);
    Ok(ranked
        .into_iter()
        .filter_map(|id| destinations.get(id).cloned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserHistory;

    fn destination(id: u32) -> Destination {
        Destination {
            id,
            name: format!("Destination {}", id),
            state: "Kerala".to_string(),
            destination_type: "Nature".to_string(),
            popularity: 8.0,
            best_time_to_visit: "Oct-Mar".to_string(),
        }
    }

    fn table(ids: impl IntoIterator<Item = u32>) -> DestinationTable {
        DestinationTable::new(ids.into_iter().map(destination).collect()).unwrap()
    }

    fn history(rows: &[(u32, &[(u32, f64)])]) -> Vec<UserHistory> {
        rows.iter()
            .flat_map(|(user_id, ratings)| {
                ratings.iter().map(move |&(destination_id, rating)| UserHistory {
                    user_id: *user_id,
                    destination_id,
                    rating,
                })
            })
            .collect()
    }

    /// Six users; user 3 rated only with zeros.
    fn six_users() -> (RatingMatrix, SimilarityMatrix) {
        let records = history(&[
            (1, &[(1, 5.0), (2, 4.0), (3, 1.0)]),
            (2, &[(1, 4.0), (2, 5.0), (4, 2.0)]),
            (3, &[(1, 0.0), (5, 0.0)]),
            (4, &[(3, 5.0), (4, 4.0), (5, 3.0)]),
            (5, &[(1, 3.0), (5, 5.0)]),
            (6, &[(2, 2.0), (3, 3.0), (4, 5.0)]),
        ]);
        let ratings = RatingMatrix::from_history(&records);
        let similarity = SimilarityMatrix::from_ratings(&ratings);
        (ratings, similarity)
    }

    #[test]
    fn test_neighbours_exclude_target() {
        let similarities = [0.9, 1.0, 0.9, 0.2];
        let neighbours = nearest_neighbours(&similarities, 1, 5);
        assert!(!neighbours.contains(&1));
        assert_eq!(neighbours, vec![0, 2, 3]);
    }

    #[test]
    fn test_neighbour_ties_keep_row_order() {
        let similarities = [0.5, 0.5, 1.0, 0.5, 0.7];
        assert_eq!(nearest_neighbours(&similarities, 2, 3), vec![4, 0, 1]);
    }

    #[test]
    fn test_rank_uses_mean_rating_with_stable_ties() {
        let records = history(&[
            (1, &[(10, 4.0), (20, 2.0), (30, 4.0)]),
            (2, &[(10, 2.0), (20, 4.0), (30, 2.0), (40, 1.0)]),
        ]);
        let ratings = RatingMatrix::from_history(&records);
        // Means: 10 → 3, 20 → 3, 30 → 3, 40 → 0.5
        assert_eq!(rank_destinations(&[0, 1], &ratings, 10), vec![10, 20, 30, 40]);
        assert_eq!(rank_destinations(&[0], &ratings, 2), vec![10, 30]);
        assert!(rank_destinations(&[], &ratings, 10).is_empty());
    }

    #[test]
    fn test_zero_row_user_still_gets_recommendations() {
        let (ratings, similarity) = six_users();
        for j in [0, 1, 3, 4, 5] {
            assert_eq!(similarity.get(2, j), Some(0.0));
        }

        let recommendations = collaborative_recommend(
            3,
            &similarity,
            &ratings,
            &table(1..=5),
            RecommendParams::default(),
        )
        .unwrap();

        assert!(!recommendations.is_empty());
        assert!(recommendations.len() <= 10);
        // All five other users are neighbours: destination 1 has mean 12 / 5.
        assert_eq!(recommendations[0].id, 1);
    }

    #[test]
    fn test_recommendations_are_valid_destinations() {
        let (ratings, similarity) = six_users();
        let destinations = table(1..=5);
        for user_id in 1..=6 {
            let recommendations = collaborative_recommend(
                user_id,
                &similarity,
                &ratings,
                &destinations,
                RecommendParams::default(),
            )
            .unwrap();
            assert!(recommendations.len() <= 10);
            assert!(recommendations
                .iter()
                .all(|d| destinations.get(d.id).is_some()));
        }
    }

    #[test]
    fn test_results_follow_ranking_not_table_order() {
        let records = history(&[(1, &[(1, 1.0)]), (2, &[(1, 1.0), (2, 5.0), (3, 3.0)])]);
        let ratings = RatingMatrix::from_history(&records);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        let recommendations = collaborative_recommend(
            1,
            &similarity,
            &ratings,
            &table([3, 1, 2]),
            RecommendParams::default(),
        )
        .unwrap();

        let ids: Vec<u32> = recommendations.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_missing_reference_rows_are_skipped() {
        let records = history(&[(1, &[(1, 1.0)]), (2, &[(1, 1.0), (2, 5.0)])]);
        let ratings = RatingMatrix::from_history(&records);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        let recommendations = collaborative_recommend(
            1,
            &similarity,
            &ratings,
            &table([1]),
            RecommendParams::default(),
        )
        .unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].id, 1);
    }

    #[test]
    fn test_limit_caps_result_count() {
        let wide: Vec<(u32, f64)> = (1..=15).map(|id| (id, f64::from(id))).collect();
        let records = history(&[(1, wide.as_slice()), (2, wide.as_slice())]);
        let ratings = RatingMatrix::from_history(&records);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        let recommendations = collaborative_recommend(
            1,
            &similarity,
            &ratings,
            &table(1..=15),
            RecommendParams::default(),
        )
        .unwrap();
        assert_eq!(recommendations.len(), 10);
        assert_eq!(recommendations[0].id, 15);
    }

    #[test]
    fn test_single_user_has_no_neighbours() {
        let records = history(&[(1, &[(1, 4.0)])]);
        let ratings = RatingMatrix::from_history(&records);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        let recommendations = collaborative_recommend(
            1,
            &similarity,
            &ratings,
            &table([1]),
            RecommendParams::default(),
        )
        .unwrap();
        assert!(recommendations.is_empty());
    }

    #[test]
    fn test_unknown_user_is_a_reference_error() {
        let (ratings, similarity) = six_users();
        let destinations = table(1..=5);

        for user_id in [0, -3, 7] {
            let err = collaborative_recommend(
                user_id,
                &similarity,
                &ratings,
                &destinations,
                RecommendParams::default(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                RecommendError::UnknownUser {
                    user_id,
                    known_users: 6
                }
            );
        }
    }
}
