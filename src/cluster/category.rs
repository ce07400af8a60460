/// Category tag reported for clusters whose members disagree
pub const MIXED_CATEGORY: &str = "mixed";

/// Display data for a category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub tag: &'static str,
    pub label: &'static str,
    /// Marker colour as `#rrggbb`
    pub color: &'static str,
}

const CATEGORY_STYLES: &[CategoryStyle] = &[
    CategoryStyle {
        tag: "concert",
        label: "Koncert",
        color: "#e11d48",
    },
    CategoryStyle {
        tag: "festival",
        label: "Festival",
        color: "#f97316",
    },
    CategoryStyle {
        tag: "theater",
        label: "Kazalište",
        color: "#8b5cf6",
    },
    CategoryStyle {
        tag: "sport",
        label: "Sport",
        color: "#16a34a",
    },
    CategoryStyle {
        tag: "conference",
        label: "Konferencija",
        color: "#0ea5e9",
    },
    CategoryStyle {
        tag: "workshop",
        label: "Radionica",
        color: "#eab308",
    },
    CategoryStyle {
        tag: "party",
        label: "Zabava",
        color: "#ec4899",
    },
    CategoryStyle {
        tag: "exhibition",
        label: "Izložba",
        color: "#14b8a6",
    },
];

const MIXED_STYLE: CategoryStyle = CategoryStyle {
    tag: MIXED_CATEGORY,
    label: "Razno",
    color: "#6366f1",
};

const FALLBACK_STYLE: CategoryStyle = CategoryStyle {
    tag: "other",
    label: "Ostalo",
    color: "#64748b",
};

/// Looks up display data for a category tag (case-insensitive)
pub fn category_style(tag: &str) -> CategoryStyle {
    if tag.eq_ignore_ascii_case(MIXED_CATEGORY) {
        return MIXED_STYLE;
    }
    CATEGORY_STYLES
        .iter()
        .find(|s| s.tag.eq_ignore_ascii_case(tag))
        .copied()
        .unwrap_or(FALLBACK_STYLE)
}

/// Category shared by every tag, or [`MIXED_CATEGORY`] when they differ
///
/// An empty iterator yields an empty tag.
pub fn dominant_category<'a>(mut tags: impl Iterator<Item = &'a str>) -> String {
    let Some(first) = tags.next() else {
        return String::new();
    };
    if tags.all(|t| t == first) {
        first.to_string()
    } else {
        MIXED_CATEGORY.to_string()
    }
}
