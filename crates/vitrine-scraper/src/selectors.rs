//! Markup conventions of the target store.
//!
//! Every list is in priority order: extractors take the first location that
//! yields a valid value. Reordering an entry changes which value wins on
//! pages that carry several candidates.
//!
//! Text phrases are literal Portuguese strings as rendered by the store and
//! are matched case-insensitively.

/// Product title locations.
pub mod title {
    pub const CANDIDATES: &[&str] = &[
        ".product-info-main .page-title .base",
        ".page-title .base",
        "h1.page-title",
        ".product-name h1",
        "h1.product-name",
        ".product-title",
        "h1",
        ".page-title",
    ];
}

/// Price locations.
pub mod price {
    /// List price shown struck through next to a discount.
    pub const ORIGINAL: &[&str] = &[
        ".old-price .price",
        "[data-price-type='oldPrice'] .price",
        "[data-price-type='oldPrice']",
        ".price-box del",
        ".original-price",
    ];

    /// Price actually charged.
    pub const CURRENT: &[&str] = &[
        ".special-price .price",
        "[data-price-type='finalPrice'] .price",
        "[data-price-type='finalPrice']",
        ".sale-price",
        ".current-price",
    ];

    /// Any price on the page, used when no current-price location matched.
    pub const GENERIC: &[&str] = &[
        ".product-info-price .price",
        ".price-box .price",
        ".price-wrapper .price",
        "[itemprop='price']",
        ".price",
    ];
}

/// Stock and pre-order signals.
pub mod availability {
    pub const OUT_OF_STOCK_PHRASES: &[&str] =
        &["indisponível", "esgotado", "sem estoque", "fora de estoque"];

    pub const PRE_ORDER_PHRASES: &[&str] = &["pré-venda", "pre-venda", "pré venda", "pre venda"];

    /// Badge the store renders only on pre-sale items (hidden otherwise).
    pub const PRE_SALE_INDICATOR: &[&str] = &[
        ".pre-sale",
        ".pre-venda",
        ".tag-pre-venda",
        "[class*='pre-venda']",
        "[class*='presale']",
    ];

    pub const STATUS_CONTAINERS: &[&str] = &[
        ".product-info-stock-sku",
        ".stock",
        ".availability",
        ".product-status",
        ".product-label",
        ".product-badge",
    ];

    /// Main product block, excluding navigation and footer.
    pub const PRODUCT_AREA: &[&str] = &[".product-info-main", ".product-main", ".product-view"];
}

/// Specification table ("Mais informações").
pub mod details {
    /// Row containers, first selector with any rows wins.
    pub const ROWS: &[&str] = &[
        "#product-attribute-specs-table tr",
        ".additional-attributes tr",
        ".product-details tr",
        "table.data tr",
    ];

    pub const FORMAT_CELL: &[&str] = &[
        "#product-attribute-specs-table td[data-th='Encadernação']",
        "td[data-th='Encadernação']",
    ];
    pub const FORMAT_LABELS: &[&str] = &["encadernação", "formato"];

    pub const AUTHORS_CELL: &[&str] = &[
        "#product-attribute-specs-table td[data-th='Autores']",
        "td[data-th='Autores']",
    ];
    pub const AUTHOR_LABELS: &[&str] = &["autor", "roteiro", "arte"];

    pub const REFERENCE_CELL: &[&str] = &[
        "#product-attribute-specs-table td[data-th='Referência']",
        "td[data-th='Referência']",
    ];
    pub const REFERENCE_LABELS: &[&str] = &["referência", "código", "sku"];

    /// Generic identifier holders; text first, then these attributes.
    pub const ID_HOLDERS: &[&str] = &[
        "[itemprop='sku']",
        ".product.attribute.sku .value",
        ".product-sku",
        "[data-product-sku]",
        "#product-sku",
    ];
    pub const ID_ATTRIBUTES: &[&str] = &["content", "data-product-sku", "value"];
}

/// Image locations and filters.
pub mod image {
    /// Attributes that carry an image source, eager or lazy-loaded.
    pub const SOURCE_ATTRIBUTES: &[&str] =
        &["src", "data-src", "data-lazy", "data-lazy-src", "data-original"];

    /// Candidate lists; only their first entry is used.
    pub const SRCSET_ATTRIBUTES: &[&str] = &["srcset", "data-srcset"];

    pub const SOURCE_CARRIERS: &str =
        "[src], [data-src], [data-lazy], [data-lazy-src], [data-original]";

    pub const STRUCTURAL: &[&str] = &[
        ".product.media img",
        ".gallery-placeholder img",
        ".fotorama__stage img",
        "img.product-image-photo",
        ".product-image img",
        ".product-gallery img",
        "[class*='gallery'] img",
        ".hero img",
        "[class*='hero'] img",
        "img[alt*='Capa']",
        "img[alt*='capa']",
    ];

    pub const PLACEHOLDER_MARKERS: &[&str] =
        &["placeholder", "no-image", "loading", "spinner"];

    /// Site chrome that is never the product picture. Matched as whole words
    /// of a source path or class list.
    pub const CHROME_MARKERS: &[&str] = &["logo", "nav", "icon", "banner"];

    pub const SOCIAL_DOMAINS: &[&str] = &[
        "facebook.",
        "fbcdn.",
        "instagram.",
        "twitter.",
        "twimg.",
        "youtube.",
        "ytimg.",
        "pinterest.",
        "tiktok.",
        "linkedin.",
        "whatsapp.",
    ];

    pub const EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];

    /// Keys whose string values are image candidates inside inline scripts.
    pub const SCRIPT_KEYS: &[&str] = &["image", "src", "url", "imageUrl", "photo"];
}
