use crate::{
    error::AppResult,
    models::{category, Category},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

struct DefaultCategory {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    sort_order: i32,
}

const DEFAULT_CATEGORIES: [DefaultCategory; 6] = [
    DefaultCategory {
        name: "General Discussion",
        description: "General tech discussions, announcements, and community topics",
        icon: "message-square",
        sort_order: 1,
    },
    DefaultCategory {
        name: "Security & Exploits",
        description: "Security research, vulnerability discussions, and exploit development",
        icon: "shield-alert",
        sort_order: 2,
    },
    DefaultCategory {
        name: "Programming",
        description: "Code, algorithms, languages, and development techniques",
        icon: "code",
        sort_order: 3,
    },
    DefaultCategory {
        name: "Cryptography",
        description: "Encryption, blockchain, cryptocurrency, and cryptographic protocols",
        icon: "lock",
        sort_order: 4,
    },
    DefaultCategory {
        name: "Tools & Resources",
        description: "Share and discuss tools, scripts, resources, and utilities",
        icon: "wrench",
        sort_order: 5,
    },
    DefaultCategory {
        name: "Off-Topic",
        description: "Everything else - gaming, hardware, lifestyle, and random discussions",
        icon: "coffee",
        sort_order: 6,
    },
];

/// Insert any stock category that is missing, matched by name.
/// Returns how many were created.
pub async fn ensure_default_categories(db: &DatabaseConnection) -> AppResult<usize> {
    let mut created = 0;

    for default in &DEFAULT_CATEGORIES {
        let exists = Category::find()
            .filter(category::Column::Name.eq(default.name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        category::ActiveModel {
            name: sea_orm::ActiveValue::Set(default.name.to_string()),
            description: sea_orm::ActiveValue::Set(default.description.to_string()),
            icon: sea_orm::ActiveValue::Set(default.icon.to_string()),
            sort_order: sea_orm::ActiveValue::Set(default.sort_order),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(name = default.name, "Created default category");
        created += 1;
    }

    Ok(created)
}
