#![no_main]

use issuedoc_core::codec::{decode, encode, validate};
use issuedoc_core::model::IssueDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = decode(data) else {
        return;
    };
    let Ok(issue) = validate(&doc) else {
        return;
    };
    let encoded = encode(&issue).expect("validated issues must encode");
    let decoded = decode(&encoded).expect("encoded issues must decode");
    assert_eq!(decoded, IssueDocument::from(issue.clone()));
    assert_eq!(validate(&decoded).expect("round trip stays valid"), issue);
});
