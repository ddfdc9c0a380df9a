//! Shared record graphs for unit tests.

use serde_json::json;

use crate::parser::Genealogy;

/// Three generations around John Smith (I1):
///
/// - parents Robert (I2) and Mary (I3) in F1, married after John's birth
/// - first marriage F2 with Ann (I4): Tom (I5)
/// - second, unmarried union F3 with Grace (I7): Lucy (I8), a stillborn girl (I6)
/// - I9 has no data at all
pub(crate) fn sample_genealogy() -> Genealogy {
    serde_json::from_value(json!({
        "individuals": [
            {
                "xref": "I1",
                "name": "John /Smith/",
                "sex": "male",
                "famc": "F1",
                "fams": ["F2", "F3"],
                "occupation": "Baker & Son",
                "events": [
                    {"tag": "BIRT", "body": {"date": "15 MAR 1900", "place": "Springfield, Illinois, USA"}},
                    {"tag": "DEAT", "body": {"date": "1970", "place": "Leeds, Yorkshire"}},
                    {"tag": "CHAN", "body": {"date": "3 FEB 2001"}}
                ]
            },
            {
                "xref": "I2",
                "name": "Robert /Smith/",
                "sex": "male",
                "fams": ["F1"],
                "events": [{"tag": "BIRT", "body": {"date": "ABT 1870"}}]
            },
            {
                "xref": "I3",
                "name": "Mary /Jones/",
                "sex": "female",
                "fams": ["F1"],
                "events": [{"tag": "BIRT", "body": {"date": "1875", "place": "Cork, Ireland"}}]
            },
            {
                "xref": "I4",
                "name": "Ann /Brown/",
                "sex": "female",
                "fams": ["F2"]
            },
            {
                "xref": "I5",
                "name": "Tom /Smith/",
                "sex": "male",
                "famc": "F2",
                "events": [
                    {"tag": "BIRT", "body": {"date": "1926"}},
                    {"tag": "CHR", "body": {"date": "1926", "place": "St Mary, Leeds"}}
                ]
            },
            {
                "xref": "I6",
                "sex": "female",
                "famc": "F3",
                "events": [
                    {"tag": "BIRT", "body": {"date": "1943"}},
                    {"tag": "DEAT", "body": {"date": "1943", "age": "STILLBORN"}}
                ]
            },
            {
                "xref": "I7",
                "name": "Grace /White/",
                "sex": "female",
                "fams": ["F3"]
            },
            {
                "xref": "I8",
                "name": "Lucy /Smith/",
                "sex": "female",
                "famc": "F3",
                "events": [{"tag": "BIRT", "body": {"date": "1941"}}]
            },
            {"xref": "I9"}
        ],
        "families": [
            {
                "xref": "F1",
                "husband": "I2",
                "wife": "I3",
                "children": ["I1"],
                "marriage": {"tag": "MARR", "body": {"date": "1901"}}
            },
            {
                "xref": "F2",
                "husband": "I1",
                "wife": "I4",
                "children": ["I5"],
                "marriage": {"tag": "MARR", "body": {"date": "12 JUN 1925", "place": "Leeds, Yorkshire"}}
            },
            {
                "xref": "F3",
                "husband": "I1",
                "wife": "I7",
                "children": ["I8", "I6"],
                "unmarried": true
            }
        ]
    }))
    .expect("fixture is a valid record set")
}
