//! Initial schema.
//!
//! - `users`: one row per chat, carrying the conversation state
//! - `accounts`: named ledgers owned by a user
//! - `expenses` / `incomes`: ledger entries of an account
//! - `limits`: optional spending limit of an account

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    ChatId,
    PendingAction,
    CurrentAccountId,
    CurrentExpenseId,
    CurrentIncomeId,
    CompareDate,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    CompareDate,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    AccountId,
    AmountMinor,
    Category,
    Note,
    Datetime,
    LimitExceeded,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    AccountId,
    AmountMinor,
    Category,
    Note,
    Date,
}

#[derive(Iden)]
enum Limits {
    Table,
    Id,
    AccountId,
    AmountMinor,
    Datetime,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::ChatId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PendingAction)
                            .string()
                            .not_null()
                            .default("FREE"),
                    )
                    .col(ColumnDef::new(Users::CurrentAccountId).big_integer())
                    .col(ColumnDef::new(Users::CurrentExpenseId).big_integer())
                    .col(ColumnDef::new(Users::CurrentIncomeId).big_integer())
                    .col(ColumnDef::new(Users::CompareDate).date().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::CompareDate).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-user_id")
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::ChatId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-user_id-name-unique")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .col(Accounts::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::AccountId).integer().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Category).string())
                    .col(
                        ColumnDef::new(Expenses::Note)
                            .string()
                            .not_null()
                            .default("-"),
                    )
                    .col(
                        ColumnDef::new(Expenses::Datetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::LimitExceeded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-account_id")
                            .from(Expenses::Table, Expenses::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-account_id-datetime")
                    .table(Expenses::Table)
                    .col(Expenses::AccountId)
                    .col(Expenses::Datetime)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::AccountId).integer().not_null())
                    .col(
                        ColumnDef::new(Incomes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::Category).string())
                    .col(
                        ColumnDef::new(Incomes::Note)
                            .string()
                            .not_null()
                            .default("-"),
                    )
                    .col(ColumnDef::new(Incomes::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-account_id")
                            .from(Incomes::Table, Incomes::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-account_id-date")
                    .table(Incomes::Table)
                    .col(Incomes::AccountId)
                    .col(Incomes::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Limits
        // ───────────────────────────────────────────────────────────────────
        // One limit per account is kept by the engine, not by a unique index.
        manager
            .create_table(
                Table::create()
                    .table(Limits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Limits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Limits::AccountId).integer().not_null())
                    .col(ColumnDef::new(Limits::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Limits::Datetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-limits-account_id")
                            .from(Limits::Table, Limits::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Limits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
