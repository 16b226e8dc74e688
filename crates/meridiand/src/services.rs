//! In-memory service implementations.
//!
//! Production deployments back these methods with relational repositories
//! behind the same handler interface; the in-process stores here keep the
//! binary self-contained for local runs and integration testing. Spreadsheet
//! import and export are delegated to the reporting collaborator and are not
//! wired in this binary.

use meridian_core::{FnHandler, RequestContext, Status, TypedHandler};
use meridian_proto::{iam, masterdata, methods, ResponseStatus};
use meridian_server::MethodRouter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: u32 = 20;

fn page_bounds(page: u32, page_size: u32, total: usize) -> (usize, usize) {
    let page = page.max(1) as usize;
    let size = if page_size == 0 {
        DEFAULT_PAGE_SIZE as usize
    } else {
        page_size as usize
    };
    let start = (page - 1).saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    (start, end)
}

/// In-memory master-data category store.
#[derive(Debug, Default)]
pub struct CategoryStore {
    rows: RwLock<HashMap<String, masterdata::Category>>,
}

impl CategoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&self, req: &masterdata::CreateCategoryRequest) -> Result<masterdata::Category, Status> {
        let mut rows = self.rows.write();
        if rows.values().any(|row| row.code == req.code) {
            return Err(Status::already_exists(format!(
                "category with code {} already exists",
                req.code
            )));
        }
        let category = masterdata::Category {
            id: Uuid::now_v7().to_string(),
            code: req.code.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            ..masterdata::Category::default()
        };
        rows.insert(category.id.clone(), category.clone());
        Ok(category)
    }

    fn get(&self, id: &str) -> Result<masterdata::Category, Status> {
        self.rows
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("category {id} not found")))
    }

    fn update(&self, req: &masterdata::UpdateCategoryRequest) -> Result<masterdata::Category, Status> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("category {} not found", req.id)))?;
        row.name = req.name.clone();
        row.description = req.description.clone();
        Ok(row.clone())
    }

    fn delete(&self, id: &str) -> Result<(), Status> {
        self.rows
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Status::not_found(format!("category {id} not found")))
    }

    fn list(&self, req: &masterdata::ListCategoriesRequest) -> (Vec<masterdata::Category>, u64) {
        let rows = self.rows.read();
        let needle = req.search.as_deref().unwrap_or("").to_lowercase();
        let mut matched: Vec<masterdata::Category> = rows
            .values()
            .filter(|row| {
                needle.is_empty()
                    || row.code.to_lowercase().contains(&needle)
                    || row.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.code.cmp(&b.code));

        let total = matched.len();
        let (start, end) = page_bounds(req.page, req.page_size, total);
        (matched[start..end].to_vec(), total as u64)
    }
}

/// In-memory IAM user store.
#[derive(Debug, Default)]
pub struct UserStore {
    rows: RwLock<HashMap<String, iam::User>>,
}

impl UserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&self, req: &iam::CreateUserRequest) -> Result<iam::User, Status> {
        let mut rows = self.rows.write();
        if rows
            .values()
            .any(|row| row.username == req.username || row.email == req.email)
        {
            return Err(Status::already_exists(format!(
                "user {} already exists",
                req.username
            )));
        }
        let user = iam::User {
            id: Uuid::now_v7().to_string(),
            username: req.username.clone(),
            email: req.email.clone(),
            full_name: req.full_name.clone(),
            is_active: true,
            roles: req.roles.clone(),
        };
        rows.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn get(&self, id: &str) -> Result<iam::User, Status> {
        self.rows
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("user {id} not found")))
    }

    fn update(&self, req: &iam::UpdateUserRequest) -> Result<iam::User, Status> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("user {} not found", req.id)))?;
        if !req.full_name.is_empty() {
            row.full_name = req.full_name.clone();
        }
        if !req.email.is_empty() {
            row.email = req.email.clone();
        }
        Ok(row.clone())
    }

    fn delete(&self, id: &str) -> Result<(), Status> {
        self.rows
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Status::not_found(format!("user {id} not found")))
    }

    fn list(&self, req: &iam::ListUsersRequest) -> (Vec<iam::User>, u64) {
        let rows = self.rows.read();
        let needle = req.search.as_deref().unwrap_or("").to_lowercase();
        let mut matched: Vec<iam::User> = rows
            .values()
            .filter(|row| {
                needle.is_empty()
                    || row.username.to_lowercase().contains(&needle)
                    || row.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.username.cmp(&b.username));

        let total = matched.len();
        let (start, end) = page_bounds(req.page, req.page_size, total);
        (matched[start..end].to_vec(), total as u64)
    }

    fn access(&self, id: &str) -> Result<(Vec<String>, Vec<String>), Status> {
        let user = self.get(id)?;
        let mut permissions: Vec<String> = user
            .roles
            .iter()
            .flat_map(|role| role_permissions(role))
            .map(ToString::to_string)
            .collect();
        permissions.sort_unstable();
        permissions.dedup();
        Ok((user.roles, permissions))
    }
}

// Seed role assignments; production resolves these from the IAM tables.
fn role_permissions(role: &str) -> &'static [&'static str] {
    match role {
        "MASTERDATA_ADMIN" => &[
            "masterdata.master.category.create",
            "masterdata.master.category.view",
            "masterdata.master.category.update",
            "masterdata.master.category.delete",
        ],
        "MASTERDATA_VIEWER" => &["masterdata.master.category.view"],
        "IAM_ADMIN" => &[
            "iam.access.user.create",
            "iam.access.user.view",
            "iam.access.user.update",
            "iam.access.user.delete",
        ],
        _ => &[],
    }
}

/// Registers every service handler on the router.
pub fn register(router: &mut MethodRouter, categories: &Arc<CategoryStore>, users: &Arc<UserStore>) {
    register_categories(router, categories);
    register_users(router, users);
}

fn register_categories(router: &mut MethodRouter, store: &Arc<CategoryStore>) {
    let create = Arc::clone(store);
    router.register(
        methods::category::CREATE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: masterdata::CreateCategoryRequest| {
                let result = create.create(&req);
                async move {
                    Ok(masterdata::CreateCategoryResponse {
                        base: ResponseStatus::created("Category created"),
                        category: Some(result?),
                    })
                }
            },
        )),
    );

    let get = Arc::clone(store);
    router.register(
        methods::category::GET,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: masterdata::GetCategoryRequest| {
                let result = get.get(&req.id);
                async move {
                    Ok(masterdata::GetCategoryResponse {
                        base: ResponseStatus::success("Category retrieved"),
                        category: Some(result?),
                    })
                }
            },
        )),
    );

    let update = Arc::clone(store);
    router.register(
        methods::category::UPDATE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: masterdata::UpdateCategoryRequest| {
                let result = update.update(&req);
                async move {
                    Ok(masterdata::UpdateCategoryResponse {
                        base: ResponseStatus::success("Category updated"),
                        category: Some(result?),
                    })
                }
            },
        )),
    );

    let delete = Arc::clone(store);
    router.register(
        methods::category::DELETE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: masterdata::DeleteCategoryRequest| {
                let result = delete.delete(&req.id);
                async move {
                    result?;
                    Ok(masterdata::DeleteCategoryResponse {
                        base: ResponseStatus::success("Category deleted"),
                    })
                }
            },
        )),
    );

    let list = Arc::clone(store);
    router.register(
        methods::category::LIST,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: masterdata::ListCategoriesRequest| {
                let (categories, total_count) = list.list(&req);
                async move {
                    Ok(masterdata::ListCategoriesResponse {
                        base: ResponseStatus::success("Categories retrieved"),
                        categories,
                        total_count,
                    })
                }
            },
        )),
    );

    router.register(
        methods::category::EXPORT,
        TypedHandler::new(FnHandler::new(
            |_ctx: &RequestContext, _req: masterdata::ExportCategoriesRequest| async move {
                Err::<masterdata::ExportCategoriesResponse, Status>(Status::unimplemented(
                    "category export is not enabled on this deployment",
                ))
            },
        )),
    );

    router.register(
        methods::category::IMPORT,
        TypedHandler::new(FnHandler::new(
            |_ctx: &RequestContext, _req: masterdata::ImportCategoriesRequest| async move {
                Err::<masterdata::ImportCategoriesResponse, Status>(Status::unimplemented(
                    "category import is not enabled on this deployment",
                ))
            },
        )),
    );
}

fn register_users(router: &mut MethodRouter, store: &Arc<UserStore>) {
    let create = Arc::clone(store);
    router.register(
        methods::user::CREATE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::CreateUserRequest| {
                let result = create.create(&req);
                async move {
                    Ok(iam::CreateUserResponse {
                        base: ResponseStatus::created("User created"),
                        user: Some(result?),
                    })
                }
            },
        )),
    );

    let get = Arc::clone(store);
    router.register(
        methods::user::GET,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::GetUserRequest| {
                let result = get.get(&req.id);
                async move {
                    Ok(iam::GetUserResponse {
                        base: ResponseStatus::success("User retrieved"),
                        user: Some(result?),
                    })
                }
            },
        )),
    );

    let update = Arc::clone(store);
    router.register(
        methods::user::UPDATE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::UpdateUserRequest| {
                let result = update.update(&req);
                async move {
                    Ok(iam::UpdateUserResponse {
                        base: ResponseStatus::success("User updated"),
                        user: Some(result?),
                    })
                }
            },
        )),
    );

    let delete = Arc::clone(store);
    router.register(
        methods::user::DELETE,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::DeleteUserRequest| {
                let result = delete.delete(&req.id);
                async move {
                    result?;
                    Ok(iam::DeleteUserResponse {
                        base: ResponseStatus::success("User deleted"),
                    })
                }
            },
        )),
    );

    let list = Arc::clone(store);
    router.register(
        methods::user::LIST,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::ListUsersRequest| {
                let (users, total_count) = list.list(&req);
                async move {
                    Ok(iam::ListUsersResponse {
                        base: ResponseStatus::success("Users retrieved"),
                        users,
                        total_count,
                    })
                }
            },
        )),
    );

    let access = Arc::clone(store);
    router.register(
        methods::user::GET_ACCESS,
        TypedHandler::new(FnHandler::new(
            move |_ctx: &RequestContext, req: iam::GetUserAccessRequest| {
                let result = access.access(&req.id);
                async move {
                    let (roles, permissions) = result?;
                    Ok(iam::GetUserAccessResponse {
                        base: ResponseStatus::success("User access retrieved"),
                        roles,
                        permissions,
                    })
                }
            },
        )),
    );
}
