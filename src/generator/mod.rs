//! Random synthesis of offers from base offers.

use chrono::{DateTime, Duration, Utc};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::models::{BaseOffer, Good, GeneratedOffer, HostType, HousingType, Vocabulary};

pub const MIN_PRICE: u32 = 100;
pub const MAX_PRICE: u32 = 100_000;
pub const MIN_BEDROOMS: u8 = 1;
pub const MAX_BEDROOMS: u8 = 8;
pub const MIN_ADULTS: u8 = 1;
pub const MAX_ADULTS: u8 = 10;
pub const MAX_RATING: f64 = 5.0;
/// Upper bound (exclusive) of the offset added to base coordinates.
pub const COORDINATE_JITTER: f64 = 0.01;
/// Publication dates are spread over this many days before now.
pub const PUBLICATION_WINDOW_DAYS: i64 = 7;
const MAX_TITLE_SUFFIX: u32 = 1000;

/// Builds [`GeneratedOffer`] values from base offers using an injectable RNG.
pub struct OfferGenerator<R: Rng> {
    rng: R,
}

impl OfferGenerator<rand::rngs::ThreadRng> {
    /// Generator backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl<R: Rng> OfferGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Pick one of the base offers uniformly at random.
    pub fn pick_base<'a>(&mut self, bases: &'a [BaseOffer]) -> Option<&'a BaseOffer> {
        bases.choose(&mut self.rng)
    }

    /// Synthesize a single offer seeded by `base`.
    pub fn generate(&mut self, base: &BaseOffer) -> GeneratedOffer {
        let seed = base.with_defaults();
        let suffix = self.rng.random_range(1..=MAX_TITLE_SUFFIX);

        GeneratedOffer {
            title: format!("{} {}", seed.title, suffix),
            description: seed.description,
            publication_date: self.publication_date(Utc::now()),
            city: self.pick(),
            preview_image: seed.preview_image,
            images: seed.images,
            is_premium: self.rng.random_bool(0.5),
            is_favorite: self.rng.random_bool(0.5),
            rating: round_to(self.rng.random_range(0.0..=MAX_RATING), 1),
            housing_type: self.pick::<HousingType>(),
            bedrooms: self.rng.random_range(MIN_BEDROOMS..=MAX_BEDROOMS),
            max_adults: self.rng.random_range(MIN_ADULTS..=MAX_ADULTS),
            price: self.rng.random_range(MIN_PRICE..=MAX_PRICE),
            goods: self.goods(),
            host_name: seed.host_name,
            host_email: seed.host_email,
            host_avatar: seed.host_avatar,
            host_type: self.pick::<HostType>(),
            latitude: self.jitter(seed.latitude),
            longitude: self.jitter(seed.longitude),
        }
    }

    fn pick<T: Vocabulary>(&mut self) -> T {
        let index = self.rng.random_range(0..T::ALL.len());
        T::ALL[index]
    }

    /// Shuffle the vocabulary and keep a non-empty prefix of random length.
    fn goods(&mut self) -> Vec<Good> {
        let mut goods = Good::ALL.to_vec();
        goods.shuffle(&mut self.rng);
        let count = self.rng.random_range(1..=goods.len());
        goods.truncate(count);
        goods
    }

    fn jitter(&mut self, coordinate: Option<f64>) -> f64 {
        match coordinate {
            Some(value) => round_to(value + self.rng.random_range(0.0..COORDINATE_JITTER), 6),
            None => 0.0,
        }
    }

    /// Millisecond precision so the value survives a TSV round trip.
    fn publication_date(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = Duration::days(PUBLICATION_WINDOW_DAYS).num_milliseconds();
        let millis = now.timestamp_millis() - self.rng.random_range(0..=window);
        DateTime::from_timestamp_millis(millis).unwrap_or(now)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> OfferGenerator<StdRng> {
        OfferGenerator::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn generated_offers_stay_in_range() {
        let mut generator = seeded(7);
        let base = BaseOffer::default();

        for _ in 0..500 {
            let offer = generator.generate(&base);

            assert!((0.0..=MAX_RATING).contains(&offer.rating));
            assert_eq!(offer.rating, round_to(offer.rating, 1));
            assert!((MIN_PRICE..=MAX_PRICE).contains(&offer.price));
            assert!((MIN_BEDROOMS..=MAX_BEDROOMS).contains(&offer.bedrooms));
            assert!((MIN_ADULTS..=MAX_ADULTS).contains(&offer.max_adults));

            let unique: HashSet<Good> = offer.goods.iter().copied().collect();
            assert!(!offer.goods.is_empty());
            assert!(offer.goods.len() <= Good::ALL.len());
            assert_eq!(unique.len(), offer.goods.len());
        }
    }

    #[test]
    fn same_seed_gives_same_choices() {
        let base = BaseOffer {
            title: Some("Loft".to_string()),
            latitude: Some(48.85661),
            longitude: Some(2.351499),
            ..BaseOffer::default()
        };

        let first = seeded(42).generate(&base);
        let second = seeded(42).generate(&base);

        assert_eq!(first.title, second.title);
        assert_eq!(first.city, second.city);
        assert_eq!(first.goods, second.goods);
        assert_eq!(first.price, second.price);
        assert_eq!(first.latitude, second.latitude);
    }

    #[test]
    fn title_gets_numeric_suffix() {
        let base = BaseOffer {
            title: Some("X".to_string()),
            ..BaseOffer::default()
        };
        let offer = seeded(1).generate(&base);

        let suffix = offer.title.strip_prefix("X ").expect("title keeps base prefix");
        let number: u32 = suffix.parse().expect("numeric suffix");
        assert!((1..=MAX_TITLE_SUFFIX).contains(&number));
    }

    #[test]
    fn missing_coordinates_become_zero() {
        let offer = seeded(3).generate(&BaseOffer::default());

        assert_eq!(offer.latitude, 0.0);
        assert_eq!(offer.longitude, 0.0);
    }

    #[test]
    fn coordinates_are_jittered_forward() {
        let base = BaseOffer {
            latitude: Some(50.938361),
            longitude: Some(6.959974),
            ..BaseOffer::default()
        };
        let mut generator = seeded(11);

        for _ in 0..200 {
            let offer = generator.generate(&base);
            let lat_offset = offer.latitude - 50.938361;
            let lon_offset = offer.longitude - 6.959974;

            assert!((-1e-9..=COORDINATE_JITTER + 1e-9).contains(&lat_offset));
            assert!((-1e-9..=COORDINATE_JITTER + 1e-9).contains(&lon_offset));
            assert_eq!(offer.latitude, round_to(offer.latitude, 6));
        }
    }

    #[test]
    fn every_good_is_eventually_chosen() {
        let mut generator = seeded(99);
        let mut seen = HashSet::new();
        let mut all_sizes = HashSet::new();

        for _ in 0..300 {
            let goods = generator.goods();
            all_sizes.insert(goods.len());
            seen.extend(goods);
        }

        assert_eq!(seen.len(), Good::ALL.len());
        assert_eq!(all_sizes.len(), Good::ALL.len());
    }

    #[test]
    fn publication_date_is_within_window() {
        let mut generator = seeded(5);
        let now = Utc::now();

        for _ in 0..100 {
            let date = generator.publication_date(now);
            assert!(date <= now);
            assert!(now - date <= Duration::days(PUBLICATION_WINDOW_DAYS));
            assert_eq!(date.timestamp_subsec_nanos() % 1_000_000, 0);
        }
    }

    #[test]
    fn pick_base_handles_empty_list() {
        let mut generator = seeded(2);

        assert!(generator.pick_base(&[]).is_none());
        let bases = vec![BaseOffer::default()];
        assert!(generator.pick_base(&bases).is_some());
    }
}
