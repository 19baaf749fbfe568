use mureo::{Choice, Query, SelectQuery};

fn main() {
    let selected = SelectQuery::from_values(
        "Which fruit is your favorite?",
        ["Apple", "Banana", "Kiwi"],
    )
    .show()
    .unwrap();
    if let Some(fruit) = selected.submitted() {
        println!("Your favorite fruit is {}!", fruit);
    }

    let languages = [
        "Ada", "Erlang", "Haskell", "Julia", "Kotlin", "Lua", "OCaml", "Rust", "Scala", "Zig",
    ];
    let favorite = SelectQuery::from_values("Which language do you reach for?", languages)
        .filterable()
        .with_window(5)
        .with_help("type to filter, arrows to move")
        .show()
        .unwrap();
    if let Some(language) = favorite.submitted() {
        println!("Happy hacking in {}!", language);
    }

    let toppings = SelectQuery::new(
        "Pick your pizza toppings",
        vec![
            Choice::new("mushrooms"),
            Choice::new("olives"),
            Choice::new("pineapple").with_hint("controversial"),
            Choice::new("anchovies").disabled(),
        ],
    )
    .many()
    .show()
    .unwrap();
    if let Some(toppings) = toppings.submitted() {
        println!("On it: {}", toppings.join(", "));
    }
}
