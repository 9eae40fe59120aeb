use anyhow::{Context, Result};
use bazaar_core::models::RegisterForm;
use bazaar_core::{Role, RoleRegistry, ServiceLocator};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub nickname: String,

    /// Full name
    #[arg(long)]
    pub fio: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    /// Plaintext password (hashed before storage)
    #[arg(long, env = "BAZAAR_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run_register(args: RegisterArgs, registry: &RoleRegistry) -> Result<()> {
    let form = RegisterForm {
        nickname: args.nickname,
        fio: args.fio,
        email: args.email,
        phone_number: args.phone,
        password: args.password,
    };

    let locator = ServiceLocator::open(registry, Role::AuthorizedUser);
    let user = locator
        .auth()
        .register(form)
        .await
        .context("Registration failed")?;
    locator.close().await;

    println!("✓ Registered {} (id {})", user.email, user.id);
    Ok(())
}
