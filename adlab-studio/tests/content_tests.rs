//! Public content-type behavior: wire casing, media handling.

use adlab_studio::{AdSuggestion, BrandKit, DataUri, Platform};
use serde_json::json;

#[test]
fn ad_suggestion_uses_wire_casing() {
    let suggestion: AdSuggestion = serde_json::from_value(json!({
        "headline": "Built for the Long Trail",
        "caption": "Boots that outlast the map.",
        "cta": "Shop Now",
        "colorPalette": ["#0f172a", "#38bdf8"]
    }))
    .unwrap();

    assert_eq!(suggestion.cta, "Shop Now");
    assert_eq!(suggestion.color_palette, vec!["#0f172a", "#38bdf8"]);

    let back = serde_json::to_value(&suggestion).unwrap();
    assert!(back.get("colorPalette").is_some());
    assert!(back.get("color_palette").is_none());
}

#[test]
fn brand_kit_parses_a_full_identity() {
    let kit: BrandKit = serde_json::from_value(json!({
        "name": "Northwind",
        "mission": "Honest outdoor gear",
        "values": ["durability", "transparency"],
        "usp": "Lifetime repairs",
        "colors": ["#0f172a", "#38bdf8", "#f8fafc", "#64748b", "#e2e8f0"],
        "fonts": {"primary": "Inter", "secondary": "Lora"},
        "voice": "Plainspoken and warm"
    }))
    .unwrap();

    assert_eq!(kit.fonts.primary, "Inter");
    assert_eq!(kit.colors.len(), 5);
}

#[test]
fn incomplete_brand_kit_is_rejected() {
    let result: Result<BrandKit, _> =
        serde_json::from_value(json!({"name": "Northwind", "mission": "gear"}));
    assert!(result.is_err());
}

#[test]
fn platform_names_are_lowercase() {
    assert_eq!(Platform::Instagram.as_str(), "instagram");
    assert_eq!(serde_json::to_value(Platform::Linkedin).unwrap(), "linkedin");
    let parsed: Platform = serde_json::from_value(json!("tiktok")).unwrap();
    assert_eq!(parsed, Platform::Tiktok);
}

#[test]
fn generated_images_travel_as_data_uris() {
    let uri = DataUri::from_bytes("image/png", &[0x89, 0x50, 0x4e, 0x47]);
    let rendered = uri.to_uri();
    assert!(rendered.starts_with("data:image/png;base64,"));

    let parsed = DataUri::parse(&rendered).unwrap();
    assert_eq!(parsed.decode().unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
}
