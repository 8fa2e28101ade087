//! Master data: companies, departments, designations and the place lookups.

use serde::Serialize;

use cardportal_core::{
    CompanyId, CountryId, DepartmentId, DesignationId, ListQuery, Page, StateId,
};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{
    City, Company, CompanyPayload, Country, DataResponse, Department, DepartmentPayload,
    Designation, DesignationPayload, MessageResponse, State,
};

#[derive(Serialize)]
struct CompanyFilter {
    company_id: CompanyId,
}

#[derive(Serialize)]
struct DepartmentFilter {
    department_id: DepartmentId,
}

#[derive(Serialize)]
struct StateLookup<'a> {
    country_id: CountryId,
    search: &'a str,
}

#[derive(Serialize)]
struct CityLookup<'a> {
    state_id: StateId,
    search: &'a str,
}

impl ApiClient {
    pub async fn companies(&self, query: &ListQuery) -> Result<Page<Company>, ApiError> {
        self.list_page("/companies", query).await
    }

    pub async fn create_company(
        &self,
        payload: &CompanyPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.post("/companies", payload).await
    }

    pub async fn update_company(
        &self,
        id: CompanyId,
        payload: &CompanyPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.put(&format!("/companies/{id}"), payload).await
    }

    pub async fn delete_company(&self, id: CompanyId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/companies/{id}")).await
    }

    pub async fn departments(&self, query: &ListQuery) -> Result<Page<Department>, ApiError> {
        self.list_page("/departments", query).await
    }

    /// Departments of one company (cascading dropdown on the card form).
    pub async fn departments_of(&self, company: CompanyId) -> Result<Vec<Department>, ApiError> {
        let body: DataResponse<Vec<Department>> = self
            .get_query("/departments", &CompanyFilter {
                company_id: company,
            })
            .await?;
        Ok(body.data)
    }

    pub async fn create_department(
        &self,
        payload: &DepartmentPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.post("/departments", payload).await
    }

    pub async fn update_department(
        &self,
        id: DepartmentId,
        payload: &DepartmentPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.put(&format!("/departments/{id}"), payload).await
    }

    pub async fn delete_department(&self, id: DepartmentId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/departments/{id}")).await
    }

    pub async fn designations(&self, query: &ListQuery) -> Result<Page<Designation>, ApiError> {
        self.list_page("/designations", query).await
    }

    /// Designations of one department.
    pub async fn designations_of(
        &self,
        department: DepartmentId,
    ) -> Result<Vec<Designation>, ApiError> {
        let body: DataResponse<Vec<Designation>> = self
            .get_query("/designations", &DepartmentFilter {
                department_id: department,
            })
            .await?;
        Ok(body.data)
    }

    pub async fn create_designation(
        &self,
        payload: &DesignationPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.post("/designations", payload).await
    }

    pub async fn update_designation(
        &self,
        id: DesignationId,
        payload: &DesignationPayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.put(&format!("/designations/{id}"), payload).await
    }

    pub async fn delete_designation(
        &self,
        id: DesignationId,
    ) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/designations/{id}")).await
    }

    pub async fn countries(&self, query: &ListQuery) -> Result<Page<Country>, ApiError> {
        self.list_page("/countries", query).await
    }

    pub async fn states(&self, country: CountryId, search: &str) -> Result<Vec<State>, ApiError> {
        let body: DataResponse<Vec<State>> = self
            .get_query("/states", &StateLookup {
                country_id: country,
                search,
            })
            .await?;
        Ok(body.data)
    }

    pub async fn cities(&self, state: StateId, search: &str) -> Result<Vec<City>, ApiError> {
        let body: DataResponse<Vec<City>> = self
            .get_query("/cities", &CityLookup {
                state_id: state,
                search,
            })
            .await?;
        Ok(body.data)
    }
}
