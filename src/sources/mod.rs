pub mod http;
pub mod traits;

pub use http::HttpOfferSource;
pub use traits::OfferSource;
