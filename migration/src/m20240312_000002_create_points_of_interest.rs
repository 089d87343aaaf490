use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240312_000001_create_cities::City;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PointOfInterest::Table)
                    .if_not_exists()
                    .col(pk_auto(PointOfInterest::Id))
                    .col(string_len(PointOfInterest::Name, 50).not_null())
                    .col(string_len_null(PointOfInterest::Description, 200))
                    .col(integer(PointOfInterest::CityId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_point_of_interest_city")
                            .from(PointOfInterest::Table, PointOfInterest::CityId)
                            .to(City::Table, City::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PointOfInterest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PointOfInterest {
    Table,
    Id,
    Name,
    Description,
    CityId,
}
