use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{City, PointOfInterest};
use crate::entities::{city, point_of_interest};
use crate::repository::{CityInfoRepository, RepoError};
use crate::AppState;

impl From<city::Model> for City {
    fn from(model: city::Model) -> Self {
        City {
            id: model.id,
            name: model.name,
            description: model.description,
            points_of_interest: Vec::new(),
        }
    }
}

impl From<point_of_interest::Model> for PointOfInterest {
    fn from(model: point_of_interest::Model) -> Self {
        PointOfInterest {
            id: model.id,
            name: model.name,
            description: model.description,
            city_id: model.city_id,
        }
    }
}

enum Staged {
    Add(PointOfInterest),
    Update(PointOfInterest),
    Delete(PointOfInterest),
}

/// Repository over the durable SeaORM store. Mutations are staged on the
/// request-scoped instance and hit the database only inside [`save`], in a
/// single transaction.
///
/// [`save`]: CityInfoRepository::save
pub struct DbRepository {
    db: DatabaseConnection,
    staged: Vec<Staged>,
}

impl DbRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            staged: Vec::new(),
        }
    }

    async fn apply_staged(
        txn: &DatabaseTransaction,
        staged: Vec<Staged>,
    ) -> Result<Vec<PointOfInterest>, DbErr> {
        let mut created = Vec::new();

        for change in staged {
            match change {
                Staged::Add(poi) => {
                    let inserted = point_of_interest::ActiveModel {
                        name: Set(poi.name),
                        description: Set(poi.description),
                        city_id: Set(poi.city_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    created.push(inserted.into());
                }
                Staged::Update(poi) => {
                    point_of_interest::ActiveModel {
                        id: ActiveValue::Unchanged(poi.id),
                        name: Set(poi.name),
                        description: Set(poi.description),
                        city_id: ActiveValue::Unchanged(poi.city_id),
                    }
                    .update(txn)
                    .await?;
                }
                Staged::Delete(poi) => {
                    point_of_interest::Entity::delete_by_id(poi.id)
                        .exec(txn)
                        .await?;
                }
            }
        }

        Ok(created)
    }
}

#[async_trait]
impl CityInfoRepository for DbRepository {
    const BASE_PATH: &'static str = "/api/cities";

    fn from_state(state: &AppState) -> Self {
        Self::new(state.db.clone())
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, RepoError> {
        Ok(city::Entity::find_by_id(city_id)
            .one(&self.db)
            .await?
            .is_some())
    }

    async fn cities(&self) -> Result<Vec<City>, RepoError> {
        let models = city::Entity::find()
            .order_by_asc(city::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(City::from).collect())
    }

    async fn city(
        &self,
        city_id: i32,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, RepoError> {
        let Some(model) = city::Entity::find_by_id(city_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut found = City::from(model);
        if include_points_of_interest {
            found.points_of_interest = self.points_of_interest_for_city(city_id).await?;
        }
        Ok(Some(found))
    }

    async fn points_of_interest_for_city(
        &self,
        city_id: i32,
    ) -> Result<Vec<PointOfInterest>, RepoError> {
        let models = point_of_interest::Entity::find()
            .filter(point_of_interest::Column::CityId.eq(city_id))
            .order_by_asc(point_of_interest::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(PointOfInterest::from).collect())
    }

    async fn point_of_interest_for_city(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, RepoError> {
        let model = point_of_interest::Entity::find_by_id(point_of_interest_id)
            .filter(point_of_interest::Column::CityId.eq(city_id))
            .one(&self.db)
            .await?;
        Ok(model.map(PointOfInterest::from))
    }

    fn add_point_of_interest_for_city(&mut self, city_id: i32, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Add(PointOfInterest {
            city_id,
            ..point_of_interest
        }));
    }

    fn update_point_of_interest(&mut self, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Update(point_of_interest));
    }

    fn delete_point_of_interest(&mut self, point_of_interest: PointOfInterest) {
        self.staged.push(Staged::Delete(point_of_interest));
    }

    async fn save(&mut self) -> Option<Vec<PointOfInterest>> {
        let staged = std::mem::take(&mut self.staged);

        let txn = match self.db.begin().await {
            Ok(txn) => txn,
            Err(err) => {
                tracing::error!(error = %err, "failed to open transaction");
                return None;
            }
        };

        let created = match Self::apply_staged(&txn, staged).await {
            Ok(created) => created,
            Err(err) => {
                // Dropping the transaction rolls everything back.
                tracing::error!(error = %err, "commit failed, staged changes discarded");
                return None;
            }
        };

        match txn.commit().await {
            Ok(()) => Some(created),
            Err(err) => {
                tracing::error!(error = %err, "commit failed");
                None
            }
        }
    }
}
