//! Mint a bearer token for local development.
//!
//! Signs an HS256 token with `JWT_SECRET` so the moderation API can be
//! exercised without the real auth service.
//!
//! Usage:
//!     cargo run --bin mint_token -- <user_id> [role] [hours]
//!
//! With no arguments the user id and role are read from stdin.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use prompt_moderation::{
    domain::moderation::value_objects::SubjectId,
    presentation::http::middleware::user::{ADMIN_ROLE, UserClaims},
};
use std::io::{self, Write};

const DEFAULT_TTL_HOURS: i64 = 12;

fn prompt(label: &str) -> io::Result<String> {
    print!("{}\n> ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set to mint a token"))?;

    let mut args = std::env::args().skip(1);
    let sub = match args.next() {
        Some(sub) => sub,
        None => prompt("User id:")?,
    };
    let role = match args.next() {
        Some(role) => role,
        None => {
            let role = prompt(&format!("Role (blank for \"user\", \"{}\" for admin):", ADMIN_ROLE))?;
            if role.is_empty() { "user".to_string() } else { role }
        }
    };
    let ttl_hours = match args.next() {
        Some(raw) => raw.parse::<i64>()?,
        None => DEFAULT_TTL_HOURS,
    };

    SubjectId::new(sub.clone()).map_err(|_| anyhow::anyhow!("Invalid user id: {}", sub))?;

    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp();
    let claims = UserClaims {
        sub,
        role,
        exp: usize::try_from(exp)?,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    eprintln!(
        "Token for {} ({}) valid for {} hours:",
        claims.sub, claims.role, ttl_hours
    );
    println!("{}", token);
    Ok(())
}
