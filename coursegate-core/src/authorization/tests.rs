use super::*;
use maplit::btreeset;

fn caps(names: &[&str]) -> CapabilitySet {
    names
        .iter()
        .map(|n| Capability::new(*n).unwrap())
        .collect()
}

fn all_capability_sets() -> Vec<CapabilitySet> {
    vec![
        caps(&[]),
        caps(&["manage_courses"]),
        caps(&["delete_courses"]),
        caps(&["manage_courses", "delete_courses", "create_courses"]),
    ]
}

/// A scope of the right kind for `role` that does not contain course 34
/// (business 1, branch 10)
fn scope_excluding_course(role: Role) -> Option<Scope> {
    match role {
        Role::GlobalAdmin => None,
        Role::SuperAdmin => Some(Scope::BusinessCourses { business_id: 2 }),
        Role::Admin => Some(Scope::BranchCourses { branch_id: 11 }),
        Role::Instructor => Some(Scope::AssignedCourses {
            course_ids: btreeset! {35},
        }),
        Role::Learner => Some(Scope::EnrolledCourses {
            course_ids: btreeset! {35},
        }),
    }
}

fn scope_including_course(role: Role) -> Scope {
    match role {
        Role::GlobalAdmin => Scope::AllCourses,
        Role::SuperAdmin => Scope::BusinessCourses { business_id: 1 },
        Role::Admin => Scope::BranchCourses { branch_id: 10 },
        Role::Instructor => Scope::AssignedCourses {
            course_ids: btreeset! {34},
        },
        Role::Learner => Scope::EnrolledCourses {
            course_ids: btreeset! {34},
        },
    }
}

fn course() -> Course {
    Course::new(34, 1, 10)
}

#[test]
fn test_create_permitted_for_every_role_but_learner() {
    for role in Role::all() {
        for capabilities in all_capability_sets() {
            let decision = AuthorizationEvaluator::evaluate(
                role,
                &scope_including_course(role),
                &capabilities,
                Action::Create,
                None,
            )
            .unwrap();

            if role == Role::Learner {
                assert_eq!(decision, AccessDecision::deny(DecisionReason::RoleNotPermitted));
            } else {
                assert_eq!(decision, AccessDecision::permit(), "role {}", role);
            }
        }
    }
}

#[test]
fn test_create_ignores_course_outside_scope() {
    let decision = AuthorizationEvaluator::evaluate(
        Role::Admin,
        &Scope::BranchCourses { branch_id: 99 },
        &caps(&[]),
        Action::Create,
        Some(&course()),
    )
    .unwrap();
    assert!(decision.is_permitted());
}

#[test]
fn test_out_of_scope_course_is_never_visible() {
    let course = course();
    for role in Role::all() {
        let Some(scope) = scope_excluding_course(role) else {
            continue;
        };
        for capabilities in all_capability_sets() {
            for action in [Action::View, Action::Edit, Action::Delete] {
                let decision = AuthorizationEvaluator::evaluate(
                    role,
                    &scope,
                    &capabilities,
                    action,
                    Some(&course),
                )
                .unwrap();
                assert_eq!(
                    decision,
                    AccessDecision::deny(DecisionReason::NotVisible),
                    "role {} action {} caps {:?}",
                    role,
                    action,
                    capabilities.names()
                );
            }
        }
    }
}

#[test]
fn test_view_permitted_inside_scope_for_every_role() {
    let course = course();
    for role in Role::all() {
        let decision = AuthorizationEvaluator::evaluate(
            role,
            &scope_including_course(role),
            &caps(&[]),
            Action::View,
            Some(&course),
        )
        .unwrap();
        assert!(decision.is_permitted(), "role {}", role);
    }
}

#[test]
fn test_instructor_delete_requires_explicit_capability() {
    let scope = Scope::AssignedCourses {
        course_ids: btreeset! {34},
    };
    let course = course();

    let default_caps = AuthorizationEvaluator::evaluate(
        Role::Instructor,
        &scope,
        &CapabilitySet::default(),
        Action::Delete,
        Some(&course),
    )
    .unwrap();
    assert_eq!(
        default_caps,
        AccessDecision::deny(DecisionReason::CapabilityMissing)
    );

    let manage_only = AuthorizationEvaluator::evaluate(
        Role::Instructor,
        &scope,
        &caps(&["manage_courses"]),
        Action::Delete,
        Some(&course),
    )
    .unwrap();
    assert_eq!(
        manage_only,
        AccessDecision::deny(DecisionReason::CapabilityMissing)
    );

    let granted = AuthorizationEvaluator::evaluate(
        Role::Instructor,
        &scope,
        &caps(&["manage_courses", "delete_courses"]),
        Action::Delete,
        Some(&course),
    )
    .unwrap();
    assert_eq!(granted, AccessDecision::permit());

    println!("✅ Instructor delete capability test passed");
}

#[test]
fn test_edit_requires_manage_courses() {
    let course = course();
    for role in [Role::GlobalAdmin, Role::SuperAdmin, Role::Admin, Role::Instructor] {
        let scope = scope_including_course(role);
        let without = AuthorizationEvaluator::evaluate(
            role,
            &scope,
            &caps(&["delete_courses"]),
            Action::Edit,
            Some(&course),
        )
        .unwrap();
        assert_eq!(without, AccessDecision::deny(DecisionReason::CapabilityMissing));

        let with = AuthorizationEvaluator::evaluate(
            role,
            &scope,
            &caps(&["manage_courses"]),
            Action::Edit,
            Some(&course),
        )
        .unwrap();
        assert_eq!(with, AccessDecision::permit());
    }
}

#[test]
fn test_learner_never_mutates() {
    let course = course();
    let scope = scope_including_course(Role::Learner);
    let everything = caps(&["manage_courses", "delete_courses", "create_courses"]);
    for action in [Action::Create, Action::Edit, Action::Delete] {
        let decision = AuthorizationEvaluator::evaluate(
            Role::Learner,
            &scope,
            &everything,
            action,
            Some(&course),
        )
        .unwrap();
        assert_eq!(
            decision,
            AccessDecision::deny(DecisionReason::RoleNotPermitted),
            "action {}",
            action
        );
    }
}

#[test]
fn test_global_admin_reaches_any_course() {
    let courses = [Course::new(1, 1, 1), Course::new(2, 7, 70), Course::new(3, 9, 99)];
    let manage = caps(&["manage_courses"]);
    for course in &courses {
        for action in [Action::View, Action::Edit, Action::Delete] {
            let decision = AuthorizationEvaluator::evaluate(
                Role::GlobalAdmin,
                &Scope::AllCourses,
                &manage,
                action,
                Some(course),
            )
            .unwrap();
            assert!(decision.is_permitted(), "course {} action {}", course.id, action);
        }
    }
}

#[test]
fn test_administrative_delete_needs_no_capability() {
    let course = course();
    for role in [Role::GlobalAdmin, Role::SuperAdmin, Role::Admin] {
        let decision = AuthorizationEvaluator::evaluate(
            role,
            &scope_including_course(role),
            &caps(&[]),
            Action::Delete,
            Some(&course),
        )
        .unwrap();
        assert!(decision.is_permitted(), "role {}", role);
    }
}

#[test]
fn test_super_admin_other_business_denied() {
    let foreign = Course::new(50, 2, 20);
    let scope = Scope::BusinessCourses { business_id: 1 };
    let everything = caps(&["manage_courses", "delete_courses"]);
    for action in [Action::View, Action::Edit, Action::Delete] {
        let decision = AuthorizationEvaluator::evaluate(
            Role::SuperAdmin,
            &scope,
            &everything,
            action,
            Some(&foreign),
        )
        .unwrap();
        assert_eq!(decision.reason, DecisionReason::NotVisible);
        assert!(!decision.permit);
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let scope = Scope::AssignedCourses {
        course_ids: btreeset! {34},
    };
    let capabilities = caps(&["manage_courses"]);
    let course = course();
    let first = AuthorizationEvaluator::evaluate(
        Role::Instructor,
        &scope,
        &capabilities,
        Action::Delete,
        Some(&course),
    );
    for _ in 0..10 {
        let again = AuthorizationEvaluator::evaluate(
            Role::Instructor,
            &scope,
            &capabilities,
            Action::Delete,
            Some(&course),
        );
        assert_eq!(again, first);
    }
}

#[test]
fn test_missing_course_is_an_error() {
    for action in [Action::View, Action::Edit, Action::Delete] {
        let result = AuthorizationEvaluator::evaluate(
            Role::GlobalAdmin,
            &Scope::AllCourses,
            &caps(&["manage_courses"]),
            action,
            None,
        );
        assert_eq!(result, Err(AuthorizationError::MissingResource(action)));
    }
}

#[test]
fn test_scope_of_another_role_is_an_error() {
    let result = AuthorizationEvaluator::evaluate(
        Role::Instructor,
        &Scope::AllCourses,
        &caps(&[]),
        Action::View,
        Some(&course()),
    );
    assert_eq!(
        result,
        Err(AuthorizationError::ScopeMismatch {
            role: Role::Instructor,
            scope: "all_courses"
        })
    );
}

#[test]
fn test_evaluate_labels() {
    let scope = Scope::AssignedCourses {
        course_ids: btreeset! {34},
    };
    let course = course();

    let decision = AuthorizationEvaluator::evaluate_labels(
        "instructor",
        &scope,
        &caps(&["manage_courses", "delete_courses"]),
        "delete",
        Some(&course),
    )
    .unwrap();
    assert!(decision.is_permitted());

    assert_eq!(
        AuthorizationEvaluator::evaluate_labels("owner", &scope, &caps(&[]), "view", Some(&course)),
        Err(AuthorizationError::InvalidRole("owner".to_string()))
    );
    assert_eq!(
        AuthorizationEvaluator::evaluate_labels(
            "instructor",
            &scope,
            &caps(&[]),
            "publish",
            Some(&course)
        ),
        Err(AuthorizationError::UnsupportedAction("publish".to_string()))
    );
}
