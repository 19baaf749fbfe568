use mureo::{ConfirmQuery, Query, TextQuery, Validation};

fn main() {
    let confirm = ConfirmQuery::new("May I ask you a question?")
        .with_default(true)
        .show()
        .unwrap();

    if let Some(true) = confirm.submitted() {
        let name = TextQuery::new("Hello! What's your name?")
            .with_placeholder("world")
            .with_validate(|name: &String| {
                if name.trim().is_empty() {
                    Validation::Error("a name cannot be empty".into())
                } else if name.len() < 2 {
                    Validation::Warning("that is a very short name; sure?".into())
                } else {
                    Validation::Pass
                }
            })
            .show()
            .unwrap();
        match name.submitted() {
            Some(name) => println!("Hello {}!", name),
            None => println!("Fine, stay anonymous."),
        }

        let secret = TextQuery::new("Say something secret!")
            .masked('*')
            .show()
            .unwrap();
        if let Some(secret) = secret.submitted() {
            println!("Your secret is '{}.'", secret);
        }
    }
}
