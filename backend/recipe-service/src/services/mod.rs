pub mod aggregator;
pub mod favorites;
pub mod fetcher;
pub mod reviews;
pub mod trending;

pub use aggregator::aggregate;
pub use favorites::{filter_favorites, FavoritesService};
pub use fetcher::RatingFetcher;
pub use reviews::ReviewService;
pub use trending::{rank, TrendingOptions, TrendingSelector};
