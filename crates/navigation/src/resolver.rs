//! Navigation resolver.

use claimdesk_auth::{PermissionTable, Role, UnknownRoleError};

use crate::{NavigationRequest, RenderTarget, Resolution};

/// Decide whether `request` may render for `role`.
///
/// A page outside the role's permitted set is denied and the caller is pointed
/// at the role's default page; sub-resource and section parameters are dropped
/// on denial. A page addressed by a record id (the claim workspace) without
/// one is redirected the same way. A role missing from the table is an error,
/// never a decision.
pub fn resolve(
    table: &PermissionTable,
    request: &NavigationRequest,
    role: Role,
) -> Result<Resolution, UnknownRoleError> {
    if !table.has_access(role, request.page)? {
        let redirect_to = table.default_page(role)?;
        tracing::warn!(%role, requested = %request.page, %redirect_to, "navigation denied");
        return Ok(Resolution::AccessDenied {
            requested: request.page,
            redirect_to,
        });
    }

    let has_resource = request.resource_id.as_deref().is_some_and(|id| !id.is_empty());
    if request.page.takes_resource_id() && !has_resource {
        let redirect_to = table.default_page(role)?;
        tracing::warn!(%role, requested = %request.page, %redirect_to, "navigation without a record id");
        return Ok(Resolution::MissingResource {
            requested: request.page,
            redirect_to,
        });
    }

    tracing::debug!(%role, page = %request.page, resource = ?request.resource_id, "navigation allowed");
    Ok(Resolution::Render(RenderTarget {
        page: request.page,
        role,
        resource_id: request.resource_id.clone(),
        section: request.section.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use claimdesk_auth::{PageId, RolePages};

    use super::*;

    #[test]
    fn every_page_role_pair_matches_the_table() {
        let table = PermissionTable::standard();

        for role in Role::ALL {
            let permitted = table.permitted_pages(role).unwrap();
            for page in PageId::ALL {
                let mut request = NavigationRequest::page(page);
                if page.takes_resource_id() {
                    request = request.with_resource("CLM-1");
                }
                let resolution = resolve(&table, &request, role).unwrap();
                if permitted.contains(&page) {
                    let Resolution::Render(target) = resolution else {
                        panic!("{role} should render {page}");
                    };
                    assert_eq!(target.page, page);
                    assert_eq!(target.role, role);
                } else {
                    assert_eq!(
                        resolution,
                        Resolution::AccessDenied {
                            requested: page,
                            redirect_to: table.default_page(role).unwrap(),
                        },
                        "{role} must not render {page}"
                    );
                }
            }
        }
    }

    #[test]
    fn render_target_carries_resource_and_section() {
        let table = PermissionTable::standard();
        let request = NavigationRequest::page(PageId::ClaimWorkspace)
            .with_resource("CLM-1042")
            .with_section("remittance");

        let Resolution::Render(target) = resolve(&table, &request, Role::Billing).unwrap() else {
            panic!("billing may open the claim workspace");
        };
        assert_eq!(target.resource_id.as_deref(), Some("CLM-1042"));
        assert_eq!(target.section.as_deref(), Some("remittance"));
        assert_eq!(target.path(), "/claim-workspace/CLM-1042#remittance");
    }

    #[test]
    fn claim_workspace_without_claim_id_is_redirected() {
        let table = PermissionTable::standard();
        for request in [
            NavigationRequest::page(PageId::ClaimWorkspace),
            NavigationRequest::page(PageId::ClaimWorkspace).with_resource(""),
        ] {
            let resolution = resolve(&table, &request, Role::Billing).unwrap();
            assert_eq!(
                resolution,
                Resolution::MissingResource {
                    requested: PageId::ClaimWorkspace,
                    redirect_to: PageId::Dashboard,
                }
            );
            assert_eq!(resolution.redirect_to(), Some(PageId::Dashboard));
        }

        // Access is still checked first.
        let resolution =
            resolve(&table, &NavigationRequest::page(PageId::ClaimWorkspace), Role::Executive).unwrap();
        assert!(resolution.is_denied());
    }

    #[test]
    fn manager_is_redirected_from_admin_settings() {
        let table = PermissionTable::standard();
        let resolution =
            resolve(&table, &NavigationRequest::page(PageId::AdminSettings), Role::Manager).unwrap();
        assert_eq!(
            resolution,
            Resolution::AccessDenied {
                requested: PageId::AdminSettings,
                redirect_to: PageId::Dashboard,
            }
        );
    }

    #[test]
    fn unknown_role_propagates() {
        let table = PermissionTable::from_entries([(
            Role::Coder,
            RolePages::new([PageId::Dashboard], PageId::Dashboard),
        )])
        .unwrap();

        let err = resolve(&table, &NavigationRequest::page(PageId::Dashboard), Role::Executive)
            .unwrap_err();
        assert_eq!(err, UnknownRoleError("executive".to_string()));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: nothing outside the role's permitted set is ever
            /// rendered, and a redirect always lands on a permitted page.
            #[test]
            fn resolution_stays_within_permitted_pages(
                role in prop::sample::select(Role::ALL.to_vec()),
                page in prop::sample::select(PageId::ALL.to_vec()),
                resource in proptest::option::of("CLM-[0-9]{1,6}"),
            ) {
                let table = PermissionTable::standard();
                let permitted = table.permitted_pages(role).unwrap();
                let request = NavigationRequest {
                    page,
                    resource_id: resource,
                    section: None,
                };

                match resolve(&table, &request, role).unwrap() {
                    Resolution::Render(target) => {
                        prop_assert!(permitted.contains(&target.page));
                        prop_assert_eq!(target.resource_id, request.resource_id);
                    }
                    Resolution::AccessDenied { requested, redirect_to } => {
                        prop_assert_eq!(requested, page);
                        prop_assert!(!permitted.contains(&page));
                        prop_assert!(permitted.contains(&redirect_to));
                    }
                    Resolution::MissingResource { requested, redirect_to } => {
                        prop_assert_eq!(requested, page);
                        prop_assert!(page.takes_resource_id());
                        prop_assert!(request.resource_id.is_none());
                        prop_assert!(permitted.contains(&redirect_to));
                    }
                }
            }
        }
    }
}
