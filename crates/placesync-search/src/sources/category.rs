//! Provider type → [`Category`] lookup tables.
//!
//! Each provider reports place types in its own vocabulary. Unknown types
//! always fall back to [`Category::Other`].

use placesync_core::Category;

/// Kakao Local `category_group_code` values.
const KAKAO_GROUP_CODES: &[(&str, Category)] = &[
    ("FD6", Category::Restaurant),
    ("CE7", Category::Cafe),
    ("AT4", Category::Attraction),
    ("MT1", Category::Shopping),
    ("CS2", Category::Shopping),
    ("CT1", Category::Culture),
    ("AD5", Category::Accommodation),
];

/// Keywords searched for in Kakao's free-text `category_name`
/// (e.g. `"여행 > 공원 > 도시근린공원"`) when the group code is empty or
/// unmapped.
const KAKAO_CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("카페", Category::Cafe),
    ("음식점", Category::Restaurant),
    ("숙박", Category::Accommodation),
    ("호텔", Category::Accommodation),
    ("공원", Category::Nature),
    ("해수욕장", Category::Nature),
    ("박물관", Category::Culture),
    ("미술관", Category::Culture),
    ("문화", Category::Culture),
    ("관광", Category::Attraction),
    ("명소", Category::Attraction),
    ("쇼핑", Category::Shopping),
    ("시장", Category::Shopping),
];

/// Google Places `types` values.
const GOOGLE_TYPES: &[(&str, Category)] = &[
    ("restaurant", Category::Restaurant),
    ("meal_takeaway", Category::Restaurant),
    ("meal_delivery", Category::Restaurant),
    ("bar", Category::Restaurant),
    ("bakery", Category::Restaurant),
    ("food", Category::Restaurant),
    ("cafe", Category::Cafe),
    ("coffee_shop", Category::Cafe),
    ("tea_house", Category::Cafe),
    ("tourist_attraction", Category::Attraction),
    ("amusement_park", Category::Attraction),
    ("aquarium", Category::Attraction),
    ("zoo", Category::Attraction),
    ("shopping_mall", Category::Shopping),
    ("department_store", Category::Shopping),
    ("clothing_store", Category::Shopping),
    ("supermarket", Category::Shopping),
    ("market", Category::Shopping),
    ("store", Category::Shopping),
    ("museum", Category::Culture),
    ("art_gallery", Category::Culture),
    ("performing_arts_theater", Category::Culture),
    ("cultural_center", Category::Culture),
    ("library", Category::Culture),
    ("park", Category::Nature),
    ("national_park", Category::Nature),
    ("hiking_area", Category::Nature),
    ("campground", Category::Nature),
    ("beach", Category::Nature),
    ("natural_feature", Category::Nature),
    ("lodging", Category::Accommodation),
    ("hotel", Category::Accommodation),
    ("hostel", Category::Accommodation),
    ("guest_house", Category::Accommodation),
    ("resort_hotel", Category::Accommodation),
];

/// Map a Kakao place to a category: group code first, then keywords in the
/// category path.
#[must_use]
pub fn kakao_category(group_code: &str, category_name: &str) -> Category {
    if let Some((_, category)) = KAKAO_GROUP_CODES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(group_code.trim()))
    {
        return *category;
    }

    KAKAO_CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| category_name.contains(keyword))
        .map_or(Category::Other, |(_, category)| *category)
}

/// Map a Google place's `types` list to a category. The first type with a
/// table entry wins, so the provider's primary type takes precedence.
#[must_use]
pub fn google_category<S: AsRef<str>>(types: &[S]) -> Category {
    types
        .iter()
        .find_map(|t| {
            GOOGLE_TYPES
                .iter()
                .find(|(name, _)| *name == t.as_ref())
                .map(|(_, category)| *category)
        })
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kakao_group_codes_map() {
        assert_eq!(kakao_category("FD6", ""), Category::Restaurant);
        assert_eq!(kakao_category("CE7", ""), Category::Cafe);
        assert_eq!(kakao_category("at4", ""), Category::Attraction);
        assert_eq!(kakao_category("AD5", ""), Category::Accommodation);
    }

    #[test]
    fn kakao_falls_back_to_category_name_keywords() {
        assert_eq!(
            kakao_category("", "여행 > 공원 > 도시근린공원"),
            Category::Nature
        );
        assert_eq!(
            kakao_category("", "문화,예술 > 문화시설 > 박물관"),
            Category::Culture
        );
    }

    #[test]
    fn kakao_unmapped_is_other() {
        assert_eq!(kakao_category("HP8", "의료,건강 > 병원"), Category::Other);
        assert_eq!(kakao_category("", ""), Category::Other);
    }

    #[test]
    fn google_first_known_type_wins() {
        assert_eq!(
            google_category(&["cafe", "food", "point_of_interest"]),
            Category::Cafe
        );
        assert_eq!(
            google_category(&["point_of_interest", "museum", "tourist_attraction"]),
            Category::Culture
        );
    }

    #[test]
    fn google_unknown_types_are_other() {
        assert_eq!(
            google_category(&["point_of_interest", "establishment"]),
            Category::Other
        );
        assert_eq!(google_category::<&str>(&[]), Category::Other);
    }
}
