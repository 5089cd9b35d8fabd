use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;
use warkop_api::{
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};

const CATEGORIES: &[(&str, &str)] = &[
    ("Kopi", "Minuman kopi tradisional dan modern"),
    ("Makanan", "Makanan berat dan ringan"),
    ("Minuman", "Minuman non-kopi"),
    ("Snack", "Cemilan dan makanan ringan"),
];

// (name, description, price, category, image)
const MENU: &[(&str, &str, i64, &str, &str)] = &[
    ("Kopi Hitam", "Kopi hitam tradisional dengan cita rasa yang kuat dan aromatik", 15000, "Kopi", "assets/images/kopi-hitam.jpg"),
    ("Kopi Susu", "Kopi dengan campuran susu segar yang lembut dan creamy", 18000, "Kopi", "assets/images/kopi-susu.jpg"),
    ("Nasi Goreng", "Nasi goreng spesial dengan telur, ayam, dan sayuran segar", 25000, "Makanan", "assets/images/nasi-goreng.jpg"),
    ("Mie Goreng", "Mie goreng dengan bumbu special dan topping lengkap", 22000, "Makanan", "assets/images/mie-goreng.jpg"),
    ("Es Teh Manis", "Teh manis dingin yang menyegarkan", 8000, "Minuman", "assets/images/es-teh.jpg"),
    ("Es Jeruk", "Jeruk segar dengan es batu yang menyegarkan", 12000, "Minuman", "assets/images/es-jeruk.jpg"),
    ("Kopi Tubruk", "Kopi tubruk tradisional dengan ampas kopi", 12000, "Kopi", "assets/images/kopi-tubruk.jpg"),
    ("Roti Bakar", "Roti bakar dengan selai dan mentega", 15000, "Snack", "assets/images/roti-bakar.jpg"),
];

const SETTINGS: &[(&str, &str, &str)] = &[
    ("site_name", "Warkop Nusantara", "Nama website"),
    ("site_description", "Kopi & Makanan Tradisional Terbaik", "Deskripsi website"),
    ("contact_phone", "+62 21 1234 5678", "Nomor telepon kontak"),
    ("contact_email", "info@warkopnusantara.com", "Email kontak"),
    ("contact_address", "Jl. Sudirman No. 123, Jakarta Pusat", "Alamat warkop"),
    ("opening_hours", "Senin - Minggu: 06:00 - 22:00", "Jam buka"),
    ("delivery_fee", "5000", "Biaya pengiriman"),
    ("minimum_order", "25000", "Minimum order untuk delivery"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    seed_categories(&pool).await?;
    seed_menu(&pool).await?;
    seed_settings(&pool).await?;
    ensure_admin(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    for (name, description) in CATEGORIES {
        sqlx::query(
            r#"
            INSERT INTO menu_categories (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_menu(pool: &PgPool) -> anyhow::Result<()> {
    for (name, description, price, category, image) in MENU {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, description, price, category_id, image)
            SELECT $1, $2, $3, $4, c.id, $6
            FROM menu_categories c
            WHERE c.name = $5
              AND NOT EXISTS (SELECT 1 FROM menu_items m WHERE m.name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(image)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_settings(pool: &PgPool) -> anyhow::Result<()> {
    for (key, value, description) in SETTINGS {
        sqlx::query(
            r#"
            INSERT INTO settings (setting_key, setting_value, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (setting_key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Creates the `admin` account once. The password comes from
/// `SEED_ADMIN_PASSWORD`, or is generated and printed a single time.
async fn ensure_admin(pool: &PgPool) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind("admin")
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        println!("Admin user already present: {id}");
        return Ok(());
    }

    let (password, generated) = match std::env::var("SEED_ADMIN_PASSWORD") {
        Ok(p) if !p.trim().is_empty() => (p, false),
        _ => (Uuid::new_v4().simple().to_string(), true),
    };
    let password_hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, 'admin')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("admin")
    .bind("admin@warkopnusantara.com")
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Admin user created: {id}");
    if generated {
        println!("Generated admin password (shown once): {password}");
    }
    Ok(())
}
