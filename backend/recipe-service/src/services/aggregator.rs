use crate::models::{AggregateRating, Review};

/// Mean star rating of `reviews`.
///
/// Ratings outside 1..=5 are ignored. The sum is accumulated exactly as an
/// integer and divided once, so the result does not depend on review order.
pub fn aggregate(reviews: &[Review]) -> AggregateRating {
    let (sum, count) = reviews
        .iter()
        .filter(|review| review.has_valid_rating())
        .fold((0u64, 0usize), |(sum, count), review| {
            (sum + u64::from(review.rating), count + 1)
        });

    if count == 0 {
        return AggregateRating::Unrated;
    }

    AggregateRating::Rated {
        average: sum as f64 / count as f64,
        count,
    }
}
