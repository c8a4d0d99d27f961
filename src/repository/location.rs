use diesel::prelude::*;

use crate::domain::location::{Location, NewLocation};
use crate::domain::types::LocationId;
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::repository::{DieselRepository, LocationReader, LocationWriter, RepositoryResult};

impl LocationReader for DieselRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let items = locations::table
            .order(locations::name.asc())
            .load::<DbLocation>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Location>, _>>()?;

        Ok(items)
    }

    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let location = locations::table
            .filter(locations::id.eq(id.get()))
            .first::<DbLocation>(&mut conn)
            .optional()?;

        Ok(location.map(TryInto::try_into).transpose()?)
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let db_location: DbNewLocation = location.into();

        let created = diesel::insert_into(locations::table)
            .values(db_location)
            .get_result::<DbLocation>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
