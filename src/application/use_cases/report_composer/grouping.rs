use crate::domain::response::ResponseRecord;

/// Responses sharing one item category, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub responses: Vec<&'a ResponseRecord>,
}

/// Groups responses by item category. Categories keep the order in which
/// they are first seen, and responses keep their relative order.
///
/// Categories match ignoring surrounding whitespace and case; a group is
/// labelled with the trimmed spelling seen first.
pub fn group_by_category(responses: &[ResponseRecord]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

    for response in responses {
        let category = response.category().trim();
        match groups
            .iter_mut()
            .find(|group| same_category(group.category, category))
        {
            Some(group) => group.responses.push(response),
            None => groups.push(CategoryGroup {
                category,
                responses: vec![response],
            }),
        }
    }

    groups
}

fn same_category(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
