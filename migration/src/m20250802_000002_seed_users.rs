use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250801_000001_init::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

const AFP_PLANS: &[&str] = &["HABITAT", "MODELO", "PLAN VITAL", "CAPITAL", "PROVIDA"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-08-01T09:00:00.000Z").cast_as("timestamptz");

        // A handful of sample employees
        for i in 1..=5 {
            let uuid = format!("{:032x}", i as u128);
            let national_id = format!("12.345.67{i}-{i}");
            let email = format!("empleado{i}@example.com");
            let salary = rand::random_range(450_000..=2_500_000);

            let hashed_password = &sha2::Sha256::digest(&format!("123456:{email}"))[..];

            manager
                .exec_stmt(Query::insert()
                    .into_table(User::Table)
                    .columns(["id", "created_at", "updated_at", "national_id", "name", "email", "password", "role", "salary", "afp", "health_system", "meal_allowance", "transport_allowance"])
                    .values_panic([
                        Expr::val(uuid).cast_as("uuid"),
                        time.clone(),
                        time.clone(),
                        national_id.into(),
                        format!("Empleado {i}").into(),
                        email.into(),
                        hashed_password.into(),
                        Expr::val("employee").cast_as("role_type"),
                        salary.into(),
                        AFP_PLANS[i - 1].into(),
                        "FONASA".into(),
                        30_000.into(),
                        30_000.into(),
                    ])
                    .to_owned()
            ).await.unwrap();
        }

        // Create an admin

        let hashed_password = &sha2::Sha256::digest("admin:admin@example.com")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "national_id", "name", "email", "password", "role", "salary", "afp", "health_system", "meal_allowance", "transport_allowance"])
                .values_panic([
                    Expr::val(format!("{:032x}", 12345 as u128)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    "11.111.111-1".into(),
                    "Admin".into(),
                    "admin@example.com".into(),
                    hashed_password.into(),
                    Expr::val("admin").cast_as("role_type"),
                    0.into(),
                    "".into(),
                    "".into(),
                    0.into(),
                    0.into(),
                ])
                .to_owned()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for i in 1..=5 {
            let uuid = format!("{:032x}", i as u128);

            manager
                .exec_stmt(Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col("id").eq(Expr::val(uuid).cast_as("uuid")))
                    .to_owned()
            ).await.unwrap();
        }

        manager
            .exec_stmt(Query::delete()
                .from_table(User::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", 12345 as u128)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        Ok(())
    }
}
