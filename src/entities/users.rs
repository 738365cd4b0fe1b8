use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Normalized email, the login identifier
    #[sea_orm(unique)]
    pub email: String,

    pub name: String,

    /// Argon2id password hash, or an unusable marker starting with `!`
    pub password_hash: String,

    pub is_active: bool,

    pub is_staff: bool,

    pub is_superuser: bool,

    pub last_login: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::auth_tokens::Entity")]
    AuthToken,
}

impl Related<super::auth_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
