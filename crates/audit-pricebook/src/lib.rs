pub mod columns;
pub mod normalize;
pub mod numeric;
pub mod patterns;
pub mod score;
pub mod section;
pub mod tiers;

pub use columns::{PriceColumn, SectionColumns, discover_columns, header_hints};
pub use normalize::{NormalizedPricebook, normalize_pricebook};
pub use numeric::{clean_price, is_custom_cell, parse_band};
pub use score::{DetectedCurrency, detect_currency, detect_year};
pub use section::{SectionOutcome, process_section};
pub use tiers::{BandRow, build_tiers};
