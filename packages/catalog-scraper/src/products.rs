//! Product candidate extraction from supplier HTML.
//!
//! Walks the parsed document tree and turns `<img>` elements into candidate
//! product records. This is a heuristic: it accepts false positives and
//! negatives, and relies on the catalog upsert (keyed by supplier + name) to
//! collapse duplicates.
//!
//! An image is a candidate when:
//! 1. it has non-empty `alt` text,
//! 2. neither its resolved URL nor its alt text mentions `logo` or `icon`,
//! 3. its URL looks like a product asset, or its alt text is longer than
//!    [`MIN_ALT_LEN`] characters.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ExtractError;

/// Substrings that disqualify an image (matched case-insensitively).
pub const EXCLUDED_MARKERS: &[&str] = &["logo", "icon"];

/// URL substrings that indicate a product or swatch image.
pub const PRODUCT_URL_MARKERS: &[&str] = &["product", "colour", "color", "swatch", "finish", "range"];

/// Alt text longer than this is accepted even without a product-looking URL.
pub const MIN_ALT_LEN: usize = 3;

/// An unvalidated product guess prior to persistence.
///
/// Colour, material and finish are never inferred here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductCandidate {
    /// Display name, taken from the image alt text
    pub name: String,

    /// Absolute image URL
    pub image_url: String,
}

/// A parsed page ready for candidate extraction.
///
/// Parsing happens once; [`ProductPage::candidates`] can be called any number
/// of times and each call yields a fresh, lazy pass over the document.
///
/// The underlying document is not `Send`. Collect the candidates before
/// crossing an `.await`.
pub struct ProductPage {
    document: Html,
    base_url: Url,
}

impl ProductPage {
    /// Parse `html`, resolving relative image sources against `base_url`.
    pub fn parse(html: &str, base_url: &str) -> Result<Self, ExtractError> {
        let base_url = Url::parse(base_url).map_err(|source| ExtractError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            document: Html::parse_document(html),
            base_url,
        })
    }

    /// Lazily yield candidates in document order.
    pub fn candidates(&self) -> impl Iterator<Item = ProductCandidate> + '_ {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "img")
            .filter_map(move |img| candidate_from_img(img, &self.base_url))
    }
}

/// Parse and collect all candidates in one call.
pub fn extract_candidates(html: &str, base_url: &str) -> Result<Vec<ProductCandidate>, ExtractError> {
    let page = ProductPage::parse(html, base_url)?;
    Ok(page.candidates().collect())
}

/// Acceptance policy.
///
/// Exclusions apply to the alt text and the resolved image URL. Product
/// markers only count when they appear in the image's own `src`, so the
/// page path a relative source inherits never qualifies it.
pub fn is_product_image(alt: &str, src: &str, image_url: &str) -> bool {
    let alt = alt.trim();
    if alt.is_empty() {
        return false;
    }

    let alt_lower = alt.to_lowercase();
    let url_lower = image_url.to_lowercase();

    let excluded = EXCLUDED_MARKERS
        .iter()
        .any(|marker| alt_lower.contains(marker) || url_lower.contains(marker));
    if excluded {
        return false;
    }

    let src_lower = src.to_lowercase();
    PRODUCT_URL_MARKERS.iter().any(|marker| src_lower.contains(marker))
        || alt.chars().count() > MIN_ALT_LEN
}

fn candidate_from_img(img: ElementRef<'_>, base_url: &Url) -> Option<ProductCandidate> {
    let element = img.value();

    let name = normalize_alt(element.attr("alt")?);
    if name.is_empty() {
        return None;
    }

    // Lazy-loaded galleries keep the real source in data-src
    let src = element
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| element.attr("data-src").map(str::trim))
        .filter(|s| !s.is_empty())?;

    let image_url = resolve_image_url(src, base_url)?;

    if !is_product_image(&name, src, &image_url) {
        return None;
    }

    Some(ProductCandidate { name, image_url })
}

/// Absolute sources pass through unchanged; relative ones are joined onto the base.
fn resolve_image_url(src: &str, base_url: &Url) -> Option<String> {
    if src.starts_with("data:") {
        return None;
    }

    match Url::parse(src) {
        Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => Some(src.to_string()),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base_url.join(src).ok().map(String::from)
        }
        Err(_) => None,
    }
}

fn normalize_alt(alt: &str) -> String {
    alt.split_whitespace().collect::<Vec<_>>().join(" ")
}
