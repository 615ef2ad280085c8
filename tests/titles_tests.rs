use devsage::{
    models::Difficulty,
    titles::{breadcrumbs, difficulty_label, format_minutes, format_title_case},
};

#[test]
fn test_title_case_upper_case_list() {
    assert_eq!(format_title_case("oop"), "OOP");
    assert_eq!(format_title_case("dsa"), "DSA");
}

#[test]
fn test_title_case_words() {
    assert_eq!(format_title_case("design patterns"), "Design Patterns");
    assert_eq!(format_title_case("javaScript"), "Javascript");
    assert_eq!(format_title_case(""), "");
}

#[test]
fn test_breadcrumbs() {
    let trail = breadcrumbs("/documents/design-patterns/behavioral/");
    let labels: Vec<&str> = trail.iter().map(|c| c.label.as_str()).collect();
    let paths: Vec<&str> = trail.iter().map(|c| c.path.as_str()).collect();

    assert_eq!(labels, vec!["Documents", "Design Patterns", "Behavioral"]);
    assert_eq!(
        paths,
        vec![
            "/documents",
            "/documents/design-patterns",
            "/documents/design-patterns/behavioral"
        ]
    );
    assert!(!trail[0].current);
    assert!(trail[2].current);
}

#[test]
fn test_breadcrumbs_upper_case_segment() {
    let trail = breadcrumbs("/documents/oop");
    assert_eq!(trail[1].label, "OOP");
    assert!(breadcrumbs("/").is_empty());
}

#[test]
fn test_difficulty_labels() {
    let easy = difficulty_label(Difficulty::Beginner);
    assert_eq!((easy.text.as_str(), easy.variant.as_str()), ("Easy", "default"));

    let mid = difficulty_label(Difficulty::Intermediate);
    assert_eq!((mid.text.as_str(), mid.variant.as_str()), ("Intermediate", "secondary"));

    let hard = difficulty_label(Difficulty::Advanced);
    assert_eq!((hard.text.as_str(), hard.variant.as_str()), ("Hard", "destructive"));
}

#[test]
fn test_minutes() {
    assert_eq!(format_minutes(5), "5 mins");
}
