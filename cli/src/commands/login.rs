use std::fs;
use std::path::Path;

use crate::{app_config::AppConfig, session::Session};

pub async fn login_cmd(config: &AppConfig, token: &str) -> anyhow::Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    save_token_securely(&config.token_path, token)?;
    println!("Token saved to {}", config.token_path);

    let session = Session::start(config).await?;
    let plants = session.plants.plants().await?;
    session.close().await?;

    println!("User successfully logged in ({} plants).", plants.len());
    Ok(())
}

fn save_token_securely(token_path: &str, token: &str) -> anyhow::Result<()> {
    let path = Path::new(token_path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, token)?;

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}
