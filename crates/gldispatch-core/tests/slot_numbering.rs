//! Slot numbering properties for the static dispatch table

use gldispatch_core::{
    validate_slots, ConsistencyError, DescriptorSet, FunctionDescriptor, GenerationError, GeneratorConfig,
    InterfaceDocument, NoopEntry, TableLayout, Target,
};
use proptest::prelude::*;

fn interface(count: usize) -> Vec<FunctionDescriptor> {
    (0..count)
        .map(|i| FunctionDescriptor::new(format!("glFunc{i}"), "void").with_slot(i as u32))
        .collect()
}

fn document(functions: Vec<FunctionDescriptor>, targets: &[&str]) -> InterfaceDocument {
    let names: Vec<String> = functions.iter().map(|f| f.name.clone()).collect();
    InterfaceDocument {
        functions,
        exports: targets.iter().map(|t| (t.to_string(), names.clone())).collect(),
    }
}

proptest! {
    /// However the functions are shuffled and split across documents, the
    /// merged base-target table is numbered `filtered[i].slot == i`.
    #[test]
    fn test_shuffled_documents_keep_numbering(
        shuffled in Just(interface(24)).prop_shuffle(),
        split in 0usize..24,
    ) {
        let (left, right) = shuffled.split_at(split);
        let docs = vec![
            document(left.to_vec(), &["gl", "gldispatch"]),
            document(right.to_vec(), &["gl", "gldispatch"]),
        ];
        let set = DescriptorSet::from_documents(docs).unwrap();
        let layout = TableLayout::build(&set, &Target::from("gldispatch"), &GeneratorConfig::for_release()).unwrap();

        prop_assert_eq!(layout.functions.len(), set.len());
        for (i, func) in layout.functions.iter().enumerate() {
            prop_assert_eq!(func.slot, Some(i as u32));
            prop_assert_eq!(&func.name, &set.functions()[i].name);
        }
    }

    /// Dropping any single slot leaves a hole the validator reports.
    #[test]
    fn test_removed_slot_is_detected(count in 2usize..40, removed in 0usize..40) {
        let removed = removed % (count - 1);
        let mut funcs = interface(count);
        funcs.remove(removed);
        match validate_slots(&funcs) {
            Err(ConsistencyError::SlotGap { missing, .. }) => prop_assert_eq!(missing as usize, removed),
            other => prop_assert!(false, "expected a slot gap, got {:?}", other),
        }
    }

    /// The no-op array always spans the static and dynamic regions.
    #[test]
    fn test_noop_array_length(count in 0usize..32, num_dynamic in 0usize..64) {
        let set = DescriptorSet::from_functions(interface(count), &["gl"]);
        let config = GeneratorConfig::for_debug().with_num_dynamic(num_dynamic);
        let layout = TableLayout::build(&set, &Target::from("gl"), &config).unwrap();
        prop_assert_eq!(layout.noop_entries.len(), count + num_dynamic);
        let named = layout.noop_entries.iter().filter(|e| matches!(e, NoopEntry::Named { .. })).count();
        prop_assert_eq!(named, count);
    }
}

#[test]
fn test_base_target_with_extra_function_in_other_document() {
    let mut gl_only = document(interface(3), &["gl"]);
    let extra = FunctionDescriptor::new("glExtra", "void").with_slot(3);
    gl_only.functions.push(extra);
    // The extra function is never exported for "gl".
    let set = DescriptorSet::from_documents(vec![gl_only]).unwrap();
    let err = TableLayout::build(&set, &Target::from("gl"), &GeneratorConfig::for_release()).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Consistency(ConsistencyError::FilteredLengthMismatch {
            filtered: 3,
            total: 4,
            ..
        })
    ));
}
