//! Property tests for the product extractor.

use catalog_scraper::{extract_candidates, ProductPage, EXCLUDED_MARKERS};
use proptest::prelude::*;
use url::Url;

const BASE: &str = "https://supplier.example/range/";

fn alt_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        Just("Brand Logo".to_string()),
        Just("Social ICON".to_string()),
        "[A-Za-z ]{0,20}",
    ]
}

fn image_src() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9-]{1,12}\\.jpg",
        "/(logo|icon|product|colour|media)/[a-z0-9-]{1,12}\\.png",
        "https://cdn\\.example\\.com/[a-z0-9-]{1,12}\\.webp",
    ]
}

fn img_tags() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((image_src(), alt_text()), 0..12)
}

fn render(images: &[(String, String)]) -> String {
    let mut html = String::from("<html><body><main>");
    for (src, alt) in images {
        html.push_str(&format!(r#"<div class="tile"><img src="{}" alt="{}"></div>"#, src, alt));
    }
    html.push_str("</main></body></html>");
    html
}

proptest! {
    #[test]
    fn never_emits_empty_or_excluded(images in img_tags()) {
        let candidates = extract_candidates(&render(&images), BASE).unwrap();

        for candidate in candidates {
            prop_assert!(!candidate.name.trim().is_empty());
            let name = candidate.name.to_lowercase();
            let url = candidate.image_url.to_lowercase();
            for marker in EXCLUDED_MARKERS {
                prop_assert!(!name.contains(marker));
                prop_assert!(!url.contains(marker));
            }
        }
    }

    #[test]
    fn relative_sources_resolve_against_base(stem in "[a-z0-9-]{1,12}") {
        let src = format!("colour-{}.jpg", stem);
        let html = render(&[(src.clone(), "Product Swatch".to_string())]);

        let candidates = extract_candidates(&html, BASE).unwrap();
        let expected = Url::parse(BASE).unwrap().join(&src).unwrap().to_string();

        prop_assert_eq!(candidates.len(), 1);
        prop_assert_eq!(&candidates[0].image_url, &expected);
    }

    #[test]
    fn absolute_sources_unchanged(stem in "[a-z0-9-]{1,12}") {
        let src = format!("https://cdn.example.com/Product/{}.JPG", stem);
        let html = render(&[(src.clone(), "Product Swatch".to_string())]);

        let candidates = extract_candidates(&html, BASE).unwrap();
        prop_assert_eq!(candidates.len(), 1);
        prop_assert_eq!(&candidates[0].image_url, &src);
    }
}

#[test]
fn candidates_follow_document_order() {
    let html = render(&[
        ("colour-b.jpg".to_string(), "Second Colour".to_string()),
        ("logo.png".to_string(), "Brand".to_string()),
        ("colour-a.jpg".to_string(), "First Colour".to_string()),
    ]);

    let page = ProductPage::parse(&html, BASE).unwrap();
    let names: Vec<String> = page.candidates().map(|c| c.name).collect();
    assert_eq!(names, vec!["Second Colour", "First Colour"]);
}
