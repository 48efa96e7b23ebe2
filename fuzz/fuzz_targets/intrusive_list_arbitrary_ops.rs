#![no_main]

use libfuzzer_sys::fuzz_target;
use midcache::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Covers push_front, push_back, insert_before, pop_front, pop_back,
// move_to_front, remove and clear, validating links after every step.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut all_ids = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 9;
        let value = u32::from(chunk[1]);
        let pick = |ids: &Vec<_>| (!ids.is_empty()).then(|| ids[value as usize % ids.len()]);

        match op {
            0 => {
                let id = list.push_front(value);
                all_ids.push(id);
                assert_eq!(list.front_id(), Some(id));
            },
            1 => {
                let id = list.push_back(value);
                all_ids.push(id);
                assert_eq!(list.back_id(), Some(id));
            },
            2 => {
                if let Some(anchor) = pick(&all_ids) {
                    let old_len = list.len();
                    if let Ok(id) = list.insert_before(anchor, value) {
                        all_ids.push(id);
                        assert_eq!(list.len(), old_len + 1);
                        assert_eq!(list.next_id(id), Some(anchor));
                        assert_eq!(list.prev_id(anchor), Some(id));
                    } else {
                        assert!(!list.contains(anchor));
                    }
                }
            },
            3 => {
                let old_len = list.len();
                if list.pop_front().is_some() {
                    assert_eq!(list.len(), old_len - 1);
                } else {
                    assert!(list.is_empty());
                }
            },
            4 => {
                let old_len = list.len();
                if list.pop_back().is_some() {
                    assert_eq!(list.len(), old_len - 1);
                } else {
                    assert!(list.is_empty());
                }
            },
            5 => {
                if let Some(id) = pick(&all_ids) {
                    if list.move_to_front(id) {
                        assert_eq!(list.front_id(), Some(id));
                    }
                }
            },
            6 => {
                if let Some(id) = pick(&all_ids) {
                    let old_len = list.len();
                    if list.remove(id).is_some() {
                        assert_eq!(list.len(), old_len - 1);
                        assert!(!list.contains(id));
                    }
                }
            },
            7 => {
                assert_eq!(list.iter().count(), list.len());
                assert_eq!(list.iter_ids().count(), list.len());
            },
            8 => {
                list.clear();
                all_ids.clear();
                assert!(list.is_empty());
                assert_eq!(list.front(), None);
                assert_eq!(list.back(), None);
            },
            _ => unreachable!(),
        }

        if let Err(err) = list.validate() {
            panic!("list invariant broken: {err}");
        }
    }
});
