use policy::{
    Ability, AbilityCache, ActionName, CacheConfig, Document, Principal, Role, Rule, SubjectType,
    resolve,
};
use proptest::prelude::*;

const TYPES: [&str; 3] = ["Resource", "Project", "Tag"];
const IDS: [&str; 4] = ["u1", "u2", "u3", "u4"];

fn action_strategy() -> impl Strategy<Value = ActionName> {
    prop_oneof![
        Just(ActionName::Create),
        Just(ActionName::Access),
        Just(ActionName::Update),
        Just(ActionName::Delete),
        Just(ActionName::Manage),
    ]
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Admin)]
}

fn principal_strategy() -> impl Strategy<Value = Principal> {
    (prop::sample::select(IDS.to_vec()), role_strategy())
        .prop_map(|(id, role)| Principal::new(id, role))
}

/// Documents drawn from a small value space so owners and teams collide often.
fn document_strategy() -> impl Strategy<Value = Document> {
    (
        prop::sample::select(TYPES.to_vec()),
        prop::option::of(prop::sample::select(IDS.to_vec())),
        prop::option::of(prop::sample::select(vec!["core", "ops"])),
    )
        .prop_map(|(type_name, owner, team)| {
            let mut doc = Document::new(type_name);
            if let Some(owner) = owner {
                doc = doc.with_field("createdBy", owner);
            }
            if let Some(team) = team {
                doc = doc.with_field("team", team);
            }
            doc
        })
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    let subject = prop_oneof![
        Just(SubjectType::All),
        prop::sample::select(TYPES.to_vec()).prop_map(SubjectType::named),
    ];
    let condition = prop_oneof![
        prop::sample::select(IDS.to_vec()).prop_map(|id| ("createdBy", id)),
        prop::sample::select(vec!["core", "ops"]).prop_map(|team| ("team", team)),
    ];
    (
        action_strategy(),
        subject,
        prop::collection::vec(condition, 0..3),
    )
        .prop_map(|(action, subject, conditions)| {
            Rule::new(action, subject, conditions).expect("condition fields are non-empty")
        })
}

fn ability_strategy() -> impl Strategy<Value = Ability> {
    (principal_strategy(), prop::collection::vec(rule_strategy(), 0..5))
        .prop_map(|(principal, rules)| Ability::new(principal.key(), rules))
}

proptest! {
    /// Admins may do anything to anything.
    #[test]
    fn admin_dominance(
        id in "[a-z0-9]{1,8}",
        action in action_strategy(),
        doc in document_strategy(),
    ) {
        let ability = resolve(&Principal::admin(id)).unwrap();
        prop_assert!(ability.can(action, &doc));
        prop_assert!(ability.can(action, doc.type_name.as_str()));
        prop_assert!(ability.accessible_filter(action, &doc.type_name).is_everything());
    }

    /// Users may do CRUD on exactly the objects they created.
    #[test]
    fn ownership_equivalence(
        id in prop::sample::select(IDS.to_vec()),
        action in action_strategy(),
        doc in document_strategy(),
    ) {
        let ability = resolve(&Principal::user(id)).unwrap();
        let owned = doc.fields.get("createdBy").and_then(|v| v.as_str()) == Some(id);
        let expected = action != ActionName::Manage && owned;
        prop_assert_eq!(ability.can(action, &doc), expected);
    }

    /// The compiled filter selects exactly what the checker approves.
    #[test]
    fn checker_filter_consistency(
        ability in ability_strategy(),
        action in action_strategy(),
        type_name in prop::sample::select(TYPES.to_vec()),
        docs in prop::collection::vec(document_strategy(), 0..12),
    ) {
        let filter = ability.accessible_filter(action, type_name);
        for doc in docs.iter().filter(|d| d.type_name == type_name) {
            prop_assert_eq!(
                filter.matches(doc),
                ability.can(action, doc),
                "disagreement on {:?} with filter {}",
                doc,
                filter.to_query()
            );
        }
    }

    /// Resolving twice gives the same answers everywhere.
    #[test]
    fn resolution_is_deterministic(
        principal in principal_strategy(),
        action in action_strategy(),
        doc in document_strategy(),
    ) {
        let a = resolve(&principal).unwrap();
        let b = resolve(&principal).unwrap();
        prop_assert_eq!(a.rules(), b.rules());
        prop_assert_eq!(a.can(action, &doc), b.can(action, &doc));
        prop_assert_eq!(
            a.accessible_filter(action, &doc.type_name),
            b.accessible_filter(action, &doc.type_name)
        );
    }

    /// A cache of capacity K never holds more than K abilities, and eviction
    /// never changes an answer.
    #[test]
    fn cache_bound(capacity in 1u64..8, count in 1usize..40) {
        let cache = AbilityCache::new(&CacheConfig::with_capacity(capacity));
        for i in 0..count {
            let principal = Principal::user(format!("p{}", i % 20));
            let ability = cache.get_or_resolve(&principal).unwrap();
            let owned = Document::new("Resource").with_field("createdBy", principal.id.as_str());
            prop_assert!(ability.can(ActionName::Update, &owned));
            prop_assert!(ability.accessible_filter(ActionName::Update, "Resource").matches(&owned));
        }
        prop_assert!(cache.entry_count() <= capacity);
    }
}

#[test]
fn test_scenario_admin_deletes_anything() {
    let ability = resolve(&Principal::admin("u1")).unwrap();
    for type_name in TYPES {
        let doc = Document::new(type_name).with_field("createdBy", "someone");
        assert!(ability.can(ActionName::Delete, &doc));
    }
}

#[test]
fn test_scenario_owner_filter_over_collection() {
    let ability = resolve(&Principal::user("u2")).unwrap();
    let r1 = Document::new("Resource").with_field("createdBy", "u2");
    let r2 = Document::new("Resource").with_field("createdBy", "u3");

    assert!(ability.can(ActionName::Update, &r1));
    assert!(!ability.can(ActionName::Update, &r2));

    let filter = ability.accessible_filter(ActionName::Access, "Resource");
    let selected: Vec<&Document> = [&r1, &r2]
        .into_iter()
        .filter(|doc| filter.matches(*doc))
        .collect();
    assert_eq!(selected, vec![&r1]);
}

#[test]
fn test_scenario_empty_id_rejected() {
    let err = resolve(&Principal::user("")).unwrap_err();
    assert!(err.is_invalid_principal());
}
