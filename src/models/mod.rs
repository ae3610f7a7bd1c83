use std::io;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{OfferError, Result};

pub const DEFAULT_TITLE: &str = "Без названия";
pub const DEFAULT_DESCRIPTION: &str = "Без описания";
pub const DEFAULT_HOST_NAME: &str = "Без имени";

/// Column names of the offer TSV file, in output order.
pub const OFFER_COLUMNS: [&str; 20] = [
    "title",
    "description",
    "publicationDate",
    "city",
    "previewImage",
    "images",
    "isPremium",
    "isFavorite",
    "rating",
    "type",
    "bedrooms",
    "maxAdults",
    "price",
    "goods",
    "hostName",
    "hostEmail",
    "hostAvatar",
    "hostType",
    "latitude",
    "longitude",
];

/// A closed set of labels that an offer field may take.
pub trait Vocabulary: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.as_str() == label)
    }
}

/// City an offer is located in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl Vocabulary for City {
    const ALL: &'static [Self] = &[
        City::Paris,
        City::Cologne,
        City::Brussels,
        City::Amsterdam,
        City::Hamburg,
        City::Dusseldorf,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            City::Paris => "Paris",
            City::Cologne => "Cologne",
            City::Brussels => "Brussels",
            City::Amsterdam => "Amsterdam",
            City::Hamburg => "Hamburg",
            City::Dusseldorf => "Dusseldorf",
        }
    }
}

/// Kind of accommodation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HousingType {
    Apartment,
    House,
    Room,
    Hotel,
}

impl Vocabulary for HousingType {
    const ALL: &'static [Self] = &[
        HousingType::Apartment,
        HousingType::House,
        HousingType::Room,
        HousingType::Hotel,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            HousingType::Apartment => "apartment",
            HousingType::House => "house",
            HousingType::Room => "room",
            HousingType::Hotel => "hotel",
        }
    }
}

/// Account tier of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    Standard,
    Pro,
}

impl Vocabulary for HostType {
    const ALL: &'static [Self] = &[HostType::Standard, HostType::Pro];

    fn as_str(&self) -> &'static str {
        match self {
            HostType::Standard => "standard",
            HostType::Pro => "pro",
        }
    }
}

/// Amenity offered with the accommodation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Good {
    Breakfast,
    #[serde(rename = "Air conditioning")]
    AirConditioning,
    #[serde(rename = "Laptop friendly workspace")]
    LaptopFriendlyWorkspace,
    #[serde(rename = "Baby seat")]
    BabySeat,
    Washer,
    Towels,
    Fridge,
}

impl Vocabulary for Good {
    const ALL: &'static [Self] = &[
        Good::Breakfast,
        Good::AirConditioning,
        Good::LaptopFriendlyWorkspace,
        Good::BabySeat,
        Good::Washer,
        Good::Towels,
        Good::Fridge,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Good::Breakfast => "Breakfast",
            Good::AirConditioning => "Air conditioning",
            Good::LaptopFriendlyWorkspace => "Laptop friendly workspace",
            Good::BabySeat => "Baby seat",
            Good::Washer => "Washer",
            Good::Towels => "Towels",
            Good::Fridge => "Fridge",
        }
    }
}

/// Partial offer served by the mock data endpoint.
///
/// Every field is optional and unknown fields are ignored; use
/// [`BaseOffer::with_defaults`] to obtain a complete seed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseOffer {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub host_name: Option<String>,
    pub host_email: Option<String>,
    pub host_avatar: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Base offer with every text field resolved to a value that fits in one TSV cell.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSeed {
    pub title: String,
    pub description: String,
    pub preview_image: String,
    pub images: Vec<String>,
    pub host_name: String,
    pub host_email: String,
    pub host_avatar: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl BaseOffer {
    /// Substitute the default sentinel for each missing field.
    pub fn with_defaults(&self) -> OfferSeed {
        let text = |value: &Option<String>, default: &str| {
            single_line(value.as_deref().unwrap_or(default))
        };

        OfferSeed {
            title: text(&self.title, DEFAULT_TITLE),
            description: text(&self.description, DEFAULT_DESCRIPTION),
            preview_image: text(&self.preview_image, ""),
            images: self.images.clone().unwrap_or_default(),
            host_name: text(&self.host_name, DEFAULT_HOST_NAME),
            host_email: text(&self.host_email, ""),
            host_avatar: text(&self.host_avatar, ""),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Replace characters that would break the one-record-per-line layout.
fn single_line(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

/// Fully populated synthetic offer, one TSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOffer {
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    pub city: City,
    pub preview_image: String,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub housing_type: HousingType,
    pub bedrooms: u8,
    pub max_adults: u8,
    pub price: u32,
    pub goods: Vec<Good>,
    pub host_name: String,
    pub host_email: String,
    pub host_avatar: String,
    pub host_type: HostType,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeneratedOffer {
    /// Serialize into a tab separated line (without terminator), columns in
    /// [`OFFER_COLUMNS`] order.
    pub fn to_tsv_line(&self) -> Result<String> {
        let images = serde_json::to_string(&self.images).map_err(io::Error::from)?;
        let goods = serde_json::to_string(&self.goods).map_err(io::Error::from)?;

        let fields: [String; 20] = [
            self.title.clone(),
            self.description.clone(),
            self.publication_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.city.as_str().to_string(),
            self.preview_image.clone(),
            images,
            self.is_premium.to_string(),
            self.is_favorite.to_string(),
            self.rating.to_string(),
            self.housing_type.as_str().to_string(),
            self.bedrooms.to_string(),
            self.max_adults.to_string(),
            self.price.to_string(),
            goods,
            self.host_name.clone(),
            self.host_email.clone(),
            self.host_avatar.clone(),
            self.host_type.as_str().to_string(),
            self.latitude.to_string(),
            self.longitude.to_string(),
        ];

        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&fields).map_err(io::Error::from)?;
        let bytes = writer.into_inner().map_err(|err| err.into_error())?;

        let mut line = String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        if line.ends_with('\n') {
            line.pop();
        }
        Ok(line)
    }

    /// Parse a data row produced by [`GeneratedOffer::to_tsv_line`].
    pub fn from_tsv_line(line: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        let record = match reader.records().next() {
            Some(record) => record.map_err(|err| OfferError::invalid_row(err.to_string()))?,
            None => return Err(OfferError::invalid_row("empty row")),
        };
        if record.len() != OFFER_COLUMNS.len() {
            return Err(OfferError::invalid_row(format!(
                "expected {} columns, found {}",
                OFFER_COLUMNS.len(),
                record.len()
            )));
        }

        let publication_date = DateTime::parse_from_rfc3339(&record[2])
            .map_err(|err| OfferError::invalid_row(format!("publicationDate: {err}")))?
            .with_timezone(&Utc);

        Ok(Self {
            title: record[0].to_string(),
            description: record[1].to_string(),
            publication_date,
            city: parse_label(&record[3], "city")?,
            preview_image: record[4].to_string(),
            images: parse_json(&record[5], "images")?,
            is_premium: parse_value(&record[6], "isPremium")?,
            is_favorite: parse_value(&record[7], "isFavorite")?,
            rating: parse_value(&record[8], "rating")?,
            housing_type: parse_label(&record[9], "type")?,
            bedrooms: parse_value(&record[10], "bedrooms")?,
            max_adults: parse_value(&record[11], "maxAdults")?,
            price: parse_value(&record[12], "price")?,
            goods: parse_json(&record[13], "goods")?,
            host_name: record[14].to_string(),
            host_email: record[15].to_string(),
            host_avatar: record[16].to_string(),
            host_type: parse_label(&record[17], "hostType")?,
            latitude: parse_value(&record[18], "latitude")?,
            longitude: parse_value(&record[19], "longitude")?,
        })
    }
}

fn parse_label<T: Vocabulary>(value: &str, column: &str) -> Result<T> {
    T::parse(value)
        .ok_or_else(|| OfferError::invalid_row(format!("{column}: unknown value '{value}'")))
}

fn parse_value<T: std::str::FromStr>(value: &str, column: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| OfferError::invalid_row(format!("{column}: cannot parse '{value}'")))
}

fn parse_json<T: serde::de::DeserializeOwned>(value: &str, column: &str) -> Result<T> {
    serde_json::from_str(value).map_err(|err| OfferError::invalid_row(format!("{column}: {err}")))
}
