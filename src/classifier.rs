//! Heuristic product category classifier.
//!
//! `classify` is a pure, total function: it always returns a label and never
//! fails. Matching is plain substring containment against the lower-cased
//! concatenation of URL and title, evaluated over ordered rule tables so
//! that every decision is explainable as "first rule that matched".

use url::Url;

/// Label applied when no rule matches.
pub const DEFAULT_CATEGORY: &str = "Electronics";

/// Tier 1: ordered (category, keywords) table.
///
/// Order is load-bearing. Specific categories come before general ones:
/// "Wearables" must precede "Mobile Phones" so a Galaxy Watch is not
/// swallowed by the phone rules, "Personal Care" must precede
/// "Large Home Appliances" so a hair dryer is not a laundry dryer, and
/// "Accessories" must precede "Mobile Phones" so a phone case stays an
/// accessory. Within "Mobile Phones" the generic "phone" keyword is last.
const KEYWORD_RULES: &[(&str, &[&str])] = &[
    (
        "Wearables",
        &[
            "smartwatch",
            "smart watch",
            "fitness",
            "tracker",
            "watch",
            "band",
            "wearable",
            "ساعة",
        ],
    ),
    (
        "Small Home Appliances",
        &[
            "microwave",
            "coffee maker",
            "coffee machine",
            "blender",
            "kettle",
            "toaster",
            "air fryer",
            "mixer",
            "vacuum",
        ],
    ),
    (
        "Personal Care",
        &[
            "shaver",
            "epilator",
            "grooming",
            "personal care",
            "trimmer",
            "hair dryer",
            "straightener",
            "toothbrush",
        ],
    ),
    (
        "Large Home Appliances",
        &[
            "washing machine",
            "washing",
            "washer",
            "dryer",
            "refrigerator",
            "fridge",
            "freezer",
            "dishwasher",
            "غسالة",
            "ثلاجة",
        ],
    ),
    (
        "Air Conditioners & Cooling",
        &["air condition", "conditioner", "cooling", "cooler", "fan"],
    ),
    (
        "Kitchen Appliances",
        &["rice cooker", "cooker", "stove", "oven", "kitchen"],
    ),
    (
        "Gaming",
        &[
            "gaming",
            "playstation",
            "xbox",
            "nintendo",
            "console",
            "ps5",
            "ps4",
            "game",
        ],
    ),
    (
        "Cameras & Photography",
        &["camera", "dslr", "mirrorless", "lens", "photo", "video", "كاميرا"],
    ),
    ("Tablets", &["tablet", "ipad"]),
    (
        "Computers & Laptops",
        &[
            "laptop",
            "macbook",
            "notebook",
            "desktop",
            "computer",
            "لابتوب",
            "pc",
        ],
    ),
    (
        "TVs & Monitors",
        &[
            "television",
            "smart tv",
            "monitor",
            "display",
            "screen",
            "تلفزيون",
            "شاشة",
            "tv",
        ],
    ),
    (
        "Audio & Sound",
        &[
            "headphone",
            "earphone",
            "earbud",
            "headset",
            "speaker",
            "soundbar",
            "audio",
            "sound",
            "سماعة",
            "bluetooth",
        ],
    ),
    (
        "Power & Batteries",
        &["power bank", "power-bank", "powerbank", "battery", "batteries"],
    ),
    (
        "Networking",
        &["router", "modem", "wifi", "wi-fi", "access point", "network"],
    ),
    (
        "Accessories",
        &[
            "screen protector",
            "case",
            "cover",
            "charger",
            "cable",
            "adapter",
            "accessor",
        ],
    ),
    (
        "Mobile Phones",
        &[
            "smartphone",
            "iphone",
            "galaxy",
            "mobile",
            "telephone",
            "هاتف",
            "جوال",
            "phone",
        ],
    ),
];

/// Tier 2: recognized brand names, consulted only when no tier-1 keyword
/// matched. A brand alone is a weaker signal, so phone makers that also
/// sell TVs and washers sit last.
const BRAND_RULES: &[(&str, &[&str])] = &[
    (
        "Cameras & Photography",
        &["canon", "nikon", "fujifilm", "gopro", "olympus"],
    ),
    (
        "Computers & Laptops",
        &["dell", "lenovo", "asus", "acer", "msi", "toshiba"],
    ),
    ("Audio & Sound", &["jbl", "bose", "sennheiser", "marshall"]),
    ("Networking", &["tp-link", "netgear", "linksys", "d-link"]),
    ("Power & Batteries", &["anker", "duracell", "energizer"]),
    (
        "Mobile Phones",
        &[
            "samsung", "oppo", "huawei", "xiaomi", "oneplus", "vivo", "realme",
            "honor", "infinix", "tecno", "nokia",
        ],
    ),
];

/// Tier 3: URL path-segment patterns, the weakest signal of all.
const PATH_RULES: &[(&str, &str)] = &[
    ("/laptop/", "Computers & Laptops"),
    ("/laptops/", "Computers & Laptops"),
    ("/computers/", "Computers & Laptops"),
    ("/phones/", "Mobile Phones"),
    ("/mobiles/", "Mobile Phones"),
    ("/tablets/", "Tablets"),
    ("/tvs/", "TVs & Monitors"),
    ("/kitchen/", "Kitchen Appliances"),
    ("/small-appliances/", "Small Home Appliances"),
    ("/appliances/", "Large Home Appliances"),
    ("/wearables/", "Wearables"),
    ("/cameras/", "Cameras & Photography"),
    ("/accessories/", "Accessories"),
];

/// Map (URL, title) to a category label.
pub fn classify(url: &str, title: &str) -> &'static str {
    let haystack = format!("{} {}", url, title).to_lowercase();

    for (category, keywords) in KEYWORD_RULES {
        if keywords.iter().any(|keyword| haystack.contains(keyword)) {
            return category;
        }
    }

    for (category, brands) in BRAND_RULES {
        if brands.iter().any(|brand| haystack.contains(brand)) {
            return category;
        }
    }

    let path = Url::parse(url)
        .map(|parsed| parsed.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());
    for (pattern, category) in PATH_RULES {
        if path.contains(pattern) {
            return category;
        }
    }

    DEFAULT_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_inputs() {
        let url = "https://leaders.jo/en/product/oppo-reno-14-five-g-512gb-12-ram/";
        let title = "Oppo Reno 14 Five G 512GB 12 RAM";
        assert_eq!(classify(url, title), classify(url, title));
    }

    #[test]
    fn watch_titles_win_over_the_phone_catch_all() {
        // "samsung" and "galaxy" are phone signals; "watch" must win anyway.
        assert_eq!(
            classify("https://store.com/samsung-galaxy-watch", "Samsung Galaxy Watch"),
            "Wearables"
        );
    }

    #[test]
    fn worked_example_galaxy_s24() {
        assert_eq!(
            classify(
                "https://example.com/product/galaxy-s24",
                "Samsung Galaxy S24 5G 256GB"
            ),
            "Mobile Phones"
        );
    }

    #[test]
    fn brand_tier_applies_only_without_keyword_match() {
        // No tier-1 keyword in either URL or title; the camera brand decides.
        assert_eq!(
            classify("https://store.com/eos-r6-mark-ii", "Canon EOS R6 Mark II Body"),
            "Cameras & Photography"
        );
        // Phone makers are the weakest brand rule.
        assert_eq!(
            classify("https://store.com/reno-14", "Oppo Reno 14 256GB"),
            "Mobile Phones"
        );
    }

    #[test]
    fn path_segment_tier_is_the_last_resort() {
        // Neither keywords nor brands match; only the path segment does.
        assert_eq!(
            classify("https://shop.com/appliances/wm-500", "WM-500 Front Loader"),
            "Large Home Appliances"
        );
    }

    #[test]
    fn accessories_before_phones() {
        assert_eq!(
            classify("https://shop.com/item/leather-sleeve", "Phone Case Leather"),
            "Accessories"
        );
    }

    #[test]
    fn personal_care_before_laundry() {
        assert_eq!(
            classify("https://shop.com/item/bhd-500", "Braun Hair Dryer 500W"),
            "Personal Care"
        );
        assert_eq!(
            classify("https://shop.com/item/wf-45", "Samsung Front Load Washing Machine"),
            "Large Home Appliances"
        );
    }

    #[test]
    fn arabic_titles_match_as_literal_substrings() {
        assert_eq!(classify("https://store.com/item/1", "هاتف ذكي سامسونج"), "Mobile Phones");
        assert_eq!(classify("https://store.com/item/2", "تلفزيون ذكي 55 بوصة"), "TVs & Monitors");
    }

    #[test]
    fn kitchen_and_small_appliances() {
        assert_eq!(
            classify("https://shop.com/item/rc-10", "Electric Rice Cooker 1.8L"),
            "Kitchen Appliances"
        );
        assert_eq!(
            classify("https://shop.com/item/mw-1000", "LG Microwave Oven 1000W"),
            "Small Home Appliances"
        );
    }

    #[test]
    fn unmatched_products_fall_back_to_electronics() {
        assert_eq!(
            classify("https://store.com/item/unknown", "Generic Electronic Device"),
            DEFAULT_CATEGORY
        );
    }

    #[test]
    fn headphones_do_not_leak_into_phones() {
        assert_eq!(
            classify("https://shop.com/item/wh-1000xm5", "Sony WH-1000XM5 Headphones"),
            "Audio & Sound"
        );
    }
}
