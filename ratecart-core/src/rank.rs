//! Per-date top-N ranking.
//!
//! Pure transform, no I/O. Uses competition ranking: tied ratings share a
//! rank and the next distinct rating skips the tie count, so a partition
//! with ratings [5, 5, 4, 3] ranks as [1, 1, 3, 4].

use crate::records::{JoinedRow, RankedRow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Rank joined rows by `rating_rate` descending within each
/// `exchange_rate_date` partition and keep rows with rank ≤ `n`.
///
/// Ties on `rating_rate` are ordered deterministically by ascending product
/// id; the tie-break affects row order only, never the assigned rank.
/// Output is grouped by ascending date, rank ascending within each date.
pub fn top_n(joined: &[JoinedRow], n: usize) -> Vec<RankedRow> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&JoinedRow>> = BTreeMap::new();
    for row in joined {
        by_date.entry(row.exchange_rate_date).or_default().push(row);
    }

    let mut ranked = Vec::new();
    for rows in by_date.into_values() {
        ranked.extend(rank_partition(rows, n));
    }
    ranked
}

fn rank_partition(mut rows: Vec<&JoinedRow>, n: usize) -> Vec<RankedRow> {
    rows.sort_by(|a, b| {
        b.rating_rate
            .total_cmp(&a.rating_rate)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut ranked = Vec::new();
    let mut rank = 0u32;
    let mut prev_rating: Option<f64> = None;

    for (i, row) in rows.into_iter().enumerate() {
        if prev_rating != Some(row.rating_rate) {
            rank = (i + 1) as u32;
            prev_rating = Some(row.rating_rate);
        }
        if rank as usize > n {
            break;
        }
        ranked.push(RankedRow {
            rank,
            row: row.clone(),
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feb(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn row(id: i64, rating_rate: f64, date: NaiveDate) -> JoinedRow {
        JoinedRow {
            id,
            title: format!("product {id}"),
            price_usd: 10.0,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating_rate,
            rating_count: 10,
            exchange_rate_date: date,
            exchange_rate: 0.93,
            price_eur: 9.3,
        }
    }

    #[test]
    fn competition_ranking_skips_after_ties() {
        let joined = vec![
            row(1, 5.0, feb(12)),
            row(2, 5.0, feb(12)),
            row(3, 4.0, feb(12)),
            row(4, 3.0, feb(12)),
        ];

        let ranked = top_n(&joined, 5);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
    }

    #[test]
    fn cutoff_drops_rows_below_n() {
        let joined = vec![
            row(1, 5.0, feb(12)),
            row(2, 5.0, feb(12)),
            row(3, 4.0, feb(12)),
            row(4, 3.0, feb(12)),
        ];

        let ranked = top_n(&joined, 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn ranking_is_per_date_partition() {
        let joined = vec![
            row(1, 4.0, feb(13)),
            row(2, 5.0, feb(12)),
            row(3, 3.0, feb(13)),
            row(4, 2.0, feb(12)),
        ];

        let ranked = top_n(&joined, 5);
        let key: Vec<(NaiveDate, u32, i64)> = ranked
            .iter()
            .map(|r| (r.row.exchange_rate_date, r.rank, r.row.id))
            .collect();
        assert_eq!(
            key,
            vec![
                (feb(12), 1, 2),
                (feb(12), 2, 4),
                (feb(13), 1, 1),
                (feb(13), 2, 3),
            ]
        );
    }

    #[test]
    fn ties_order_deterministically_by_product_id() {
        let joined = vec![
            row(9, 4.5, feb(12)),
            row(2, 4.5, feb(12)),
            row(5, 4.5, feb(12)),
        ];

        let ranked = top_n(&joined, 5);
        let ids: Vec<i64> = ranked.iter().map(|r| r.row.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert!(ranked.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(top_n(&[], 5).is_empty());
    }

    proptest! {
        /// Within a date, ranks never exceed n, start at 1 for a non-empty
        /// partition, and ratings are non-increasing in output order.
        #[test]
        fn ranked_output_is_sorted_and_cut(
            ratings in proptest::collection::vec(0.0f64..=5.0, 0..30),
            n in 1usize..10,
        ) {
            let joined: Vec<JoinedRow> = ratings
                .iter()
                .enumerate()
                .map(|(i, &r)| row(i as i64, r, feb(12)))
                .collect();

            let ranked = top_n(&joined, n);

            prop_assert!(ranked.iter().all(|r| (r.rank as usize) <= n));
            if !joined.is_empty() {
                prop_assert_eq!(ranked[0].rank, 1);
            }
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].row.rating_rate >= pair[1].row.rating_rate);
                prop_assert!(pair[0].rank <= pair[1].rank);
            }
        }
    }
}
