use meal_import::ingredient_model::Unit;
use meal_import::ingredient_parser::parse_ingredient_line;
use meal_import::recipe_parser::{parse_markdown_recipes, split_recipe_segments};

const WEEKLY_PLAN: &str = "# Zupa pomidorowa
## Info
- Porcje: 6 osób
- Gotowanie: 40 min
- Typ: Obiad
- Tagi: Zupy, Klasyka

## Składniki
- Pomidory - 1 kg
- Bulion - 1,5 l
- Ryż - (ok. 150g)
- 2 łyżki koncentratu pomidorowego
- Śmietana 18% (200ml)

## Instrukcje
Zagotuj bulion.

Dodaj pomidory i gotuj 20 minut.

----------

Notatki na tydzień, bez przepisu.
- kupić chleb

---

# Kanapki dla dzieci
## Cechy
- Dla dzieci
- Szybkie
- Kolorowe

## Składniki
* 4 kromki chleba
* szczypta soli
";

#[test]
fn test_weekly_plan_document() {
    let segments = split_recipe_segments(WEEKLY_PLAN);
    assert_eq!(segments.len(), 3);

    let recipes = parse_markdown_recipes(WEEKLY_PLAN);
    let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Zupa pomidorowa", "Kanapki dla dzieci"]);
}

#[test]
fn test_soup_fields() {
    let recipes = parse_markdown_recipes(WEEKLY_PLAN);
    let soup = &recipes[0];

    assert_eq!(soup.servings, 6);
    assert_eq!(soup.cook_time_minutes, Some(40));
    assert_eq!(soup.prep_time_minutes, None);
    assert_eq!(soup.meal_type_names, vec!["Obiad"]);
    assert_eq!(soup.tag_names, vec!["Zupy", "Klasyka"]);
    assert_eq!(
        soup.instructions.as_deref(),
        Some("Zagotuj bulion.\n\nDodaj pomidory i gotuj 20 minut.")
    );
}

#[test]
fn test_soup_ingredients() {
    let recipes = parse_markdown_recipes(WEEKLY_PLAN);
    let lines = &recipes[0].ingredients;
    assert_eq!(lines.len(), 5);

    assert_eq!((lines[0].amount, &lines[0].unit, lines[0].name.as_str()), (1.0, &Unit::Kilograms, "Pomidory"));
    assert_eq!((lines[1].amount, &lines[1].unit, lines[1].name.as_str()), (1.5, &Unit::Liters, "Bulion"));
    assert_eq!((lines[2].amount, &lines[2].unit, lines[2].name.as_str()), (150.0, &Unit::Grams, "Ryż"));
    assert_eq!(lines[3].unit, Unit::Tablespoons);
    assert_eq!(lines[3].name, "koncentratu pomidorowego");

    // No amount in front and no dash: the whole line is the name, annotation removed
    assert_eq!(lines[4].amount, 1.0);
    assert_eq!(lines[4].unit, Unit::Pieces);
    assert_eq!(lines[4].name, "Śmietana 18%");
}

#[test]
fn test_kids_sandwiches() {
    let recipes = parse_markdown_recipes(WEEKLY_PLAN);
    let sandwiches = &recipes[1];

    assert!(sandwiches.is_child_friendly);
    assert!(sandwiches.is_quick);
    assert!(!sandwiches.is_vegetarian);
    assert_eq!(sandwiches.servings, 1);
    assert_eq!(sandwiches.instructions, None);

    assert_eq!(sandwiches.ingredients[0].amount, 4.0);
    assert_eq!(sandwiches.ingredients[0].unit, Unit::Slices);
    assert_eq!(sandwiches.ingredients[0].name, "chleba");
    assert_eq!(sandwiches.ingredients[1].name, "szczypta soli");
}

#[test]
fn test_amount_notations() {
    let bread = parse_ingredient_line("2 i 1/2 kromki chleba").unwrap();
    assert_eq!(bread.amount, 2.5);
    assert_eq!(bread.unit, Unit::Slices);
    assert_eq!(bread.name, "chleba");

    let avocado = parse_ingredient_line("1/3 szt awokado").unwrap();
    assert!((avocado.amount - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(avocado.unit, Unit::Pieces);
    assert_eq!(avocado.name, "awokado");

    let beef = parse_ingredient_line("500g mielona wołowina").unwrap();
    assert_eq!(beef.amount, 500.0);
    assert_eq!(beef.unit.as_str(), "g");
    assert_eq!(beef.name, "mielona wołowina");
}

#[test]
fn test_approximate_weight_removed_everywhere() {
    for line in [
        "- 1 opakowanie makaron (ok. 200g) penne",
        "- makaron (ok. 200g) penne - 1 opakowanie",
        "- makaron (OK. 200G) penne",
    ] {
        let parsed = parse_ingredient_line(line).unwrap();
        assert_eq!(parsed.name, "makaron penne", "line: {line}");
    }
}

#[test]
fn test_document_without_recipes() {
    assert!(parse_markdown_recipes("").is_empty());
    assert!(parse_markdown_recipes("---\n\n---").is_empty());
    assert!(parse_markdown_recipes("## Składniki\n- 1 jajko").is_empty());
}
