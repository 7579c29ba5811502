//! Property tests for identifier mapping.

use agora_governance::IdentifierMapper;
use proptest::prelude::*;

proptest! {
    #[test]
    fn mapping_is_total_and_never_empty(id in ".*") {
        let mapper = IdentifierMapper::default();
        prop_assert!(!mapper.map(&id).is_empty());
    }

    #[test]
    fn mapping_is_deterministic(id in "[0-9]{1,4}") {
        let mapper = IdentifierMapper::default();
        prop_assert_eq!(mapper.map(&id), mapper.map(&id));
    }

    #[test]
    fn result_is_known_or_fallback(id in "[0-9]{1,4}") {
        let mapper = IdentifierMapper::default();
        let mapped = mapper.map(&id);
        prop_assert!(mapper.known_ids().contains(&mapped) || mapped == mapper.fallback());
    }

    #[test]
    fn explicit_mapping_overrides_everything(id in "[0-9a-z]{1,8}", target in "[0-9]{1,6}") {
        let mapper = IdentifierMapper::default();
        mapper.add_mapping(id.clone(), target.clone());
        prop_assert!(mapper.is_mapped(&id));
        prop_assert_eq!(mapper.map(&id), target);
    }

    #[test]
    fn empty_fallback_never_leaks(id in ".*") {
        let mapper = IdentifierMapper::new(Vec::<String>::new(), "  ");
        prop_assert!(!mapper.map(&id).is_empty());
    }
}
