#[cfg(test)]
mod tests {
    use crate::cluster::category::dominant_category;
    use crate::cluster::{MIXED_CATEGORY, category_style};

    #[test]
    fn test_dominant_category() {
        assert_eq!(dominant_category(["sport", "sport"].into_iter()), "sport");
        assert_eq!(dominant_category(["sport", "party"].into_iter()), MIXED_CATEGORY);
        assert_eq!(dominant_category(std::iter::empty()), "");
    }

    #[test]
    fn test_category_style() {
        assert_eq!(category_style("concert").color, "#e11d48");
        assert_eq!(category_style("Concert").tag, "concert");
        assert_eq!(category_style(MIXED_CATEGORY).label, "Razno");
        assert_eq!(category_style("unknown-tag").tag, "other");
        assert_eq!(category_style("").tag, "other");
    }
}
