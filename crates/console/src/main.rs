//! Console entry point: log in from the environment, visit every screen,
//! report what was loaded, log out.

use anyhow::Context;

use posadmin_console::resources::{Customers, ItemCategories, Orders, Stocks};
use posadmin_console::{AuthForm, Console, ConsoleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env().context("invalid console configuration")?;
    posadmin_observability::init_with(config.log_format);

    let console = Console::start(config.clone()).context("failed to start console")?;

    match &config.login {
        Some(login) => {
            let form = AuthForm::new(login.username.clone(), login.password.clone());
            if let Err(e) = console.auth().login(&form).await {
                tracing::error!(error = %e, "login failed; only public screens will load");
            }
        }
        None => tracing::warn!("POSADMIN_USERNAME/POSADMIN_PASSWORD not set; only public screens will load"),
    }

    let customers = console.open::<Customers>().await;
    let items = console.open_item_screen().await;
    let categories = console.open::<ItemCategories>().await;
    let stock = console.open::<Stocks>().await;
    let orders = console.open::<Orders>().await;

    tracing::info!(
        authenticated = console.session().is_authenticated(),
        customers = customers.items().len(),
        items = items.items.items().len(),
        categories = categories.items().len(),
        stock = stock.items().len(),
        orders = orders.items().len(),
        "screens loaded"
    );

    for (screen, error) in [
        ("customers", customers.error()),
        ("items", items.items.error()),
        ("categories", categories.error()),
        ("stock", stock.error()),
        ("orders", orders.error()),
    ] {
        if let Some(error) = error {
            tracing::warn!(screen, %error, "screen reported an error");
        }
    }

    console.shutdown();
    Ok(())
}
