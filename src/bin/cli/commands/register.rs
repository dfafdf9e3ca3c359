use anyhow::Result;

use salita_lib::auth::{self, RegisterRequest};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    name: String,
    email: String,
    password: String,
    format: &OutputFormat,
) -> Result<()> {
    let user = auth::register(
        &app.db,
        RegisterRequest {
            name,
            email,
            password,
            image: None,
        },
    )?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
        OutputFormat::Plain => println!("Registered {} <{}> ({})", user.name, user.email, user.id),
    }

    Ok(())
}
