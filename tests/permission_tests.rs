use blog_portal::permissions::permits;

fn granted(perms: &[&str]) -> Vec<String> {
    perms.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_single_requirement_is_membership() {
    assert!(permits(&["a"], &granted(&["a", "b"])));
    assert!(!permits(&["a"], &granted(&["b"])));
    assert!(!permits(&["d"], &granted(&["a", "b", "c"])));
}

#[test]
fn test_multiple_requirements_are_subset_containment() {
    assert!(permits(&["a", "b"], &granted(&["a", "b", "c"])));
    assert!(!permits(&["a", "c"], &granted(&["a", "b"])));
    assert!(!permits(&["a", "b", "c"], &granted(&["a", "b"])));
}

#[test]
fn test_order_and_duplicates_in_requirements_are_irrelevant() {
    assert!(permits(&["b", "a"], &granted(&["a", "b"])));
    assert!(permits(&["a", "a", "b"], &granted(&["b", "a"])));
}

#[test]
fn test_nothing_is_granted_by_an_empty_set() {
    assert!(!permits(&["post.create"], &granted(&[])));
}

#[test]
fn test_empty_requirement_is_vacuously_satisfied() {
    // The authorization service short-circuits before consulting the
    // evaluator, but the containment check itself is also vacuously true.
    assert!(permits(&[], &granted(&[])));
    assert!(permits(&[], &granted(&["a"])));
}

#[test]
fn test_permission_strings_match_exactly() {
    assert!(!permits(&["post.create"], &granted(&["post.created"])));
    assert!(!permits(&["post.create"], &granted(&["Post.Create"])));
}
