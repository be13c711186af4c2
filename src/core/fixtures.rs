//! Small catalog shared by the conversation and api tests

use crate::models::TrackRecord;
use crate::stores::{Catalog, ReferenceIndex};

const ROWS: [[&str; 6]; 12] = [
    ["1", "Tum Hi Ho", "Arijit Singh", "Aashiqui 2", "Sad", "Hindi"],
    ["2", "Kesariya", "Arijit Singh", "Brahmastra", "Romantic", "Hindi"],
    ["3", "Channa Mereya", "Arijit Singh", "Ae Dil Hai Mushkil", "Sad", "Hindi"],
    ["4", "Agar Tum Saath Ho", "Arijit Singh", "Tamasha", "Sad", "Hindi"],
    ["5", "Phir Le Aya Dil", "Arijit Singh", "Barfi", "Sad", "Hindi"],
    ["6", "Ami Je Tomar", "Shreya Ghoshal", "Bhool Bhulaiyaa", "Romantic", "Bengali"],
    ["7", "Ekla Cholo Re", "Kishore Kumar", "Balidan", "Happy", "Bengali"],
    ["8", "Tomake Chai", "Arijit Singh", "Gangster", "Romantic", "Bengali"],
    ["9", "Tujhe Dekha To", "Lata Mangeshkar", "Dilwale Dulhania Le Jayenge", "Romantic", "Hindi"],
    ["10", "Kal Ho Naa Ho", "Sonu Nigam", "Kal Ho Naa Ho", "Sad", "Hindi"],
    ["11", "Balidan Theme", "Kishore Kumar", "Balidan (Original Score)", "Happy", "Bengali"],
    ["12", "Mon Majhi Re", "Arijit Singh", "Boss", "Sad", "Bengali"],
];

pub fn catalog() -> Catalog {
    Catalog::new(
        ROWS.iter()
            .map(|[id, song, artist, album, mood, language]| {
                TrackRecord::new(id, song, artist, album, mood, language)
            })
            .collect(),
    )
}

pub fn catalog_and_index() -> (Catalog, ReferenceIndex) {
    let catalog = catalog();
    let index = ReferenceIndex::build(&catalog);
    (catalog, index)
}
