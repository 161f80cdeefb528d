use super::SearchableEntity;

const RECOMMENDED: &[(i64, &str, &str)] = &[
	(1, "Reliance Industries Limited", "/company/RELIANCE/consolidated/"),
	(2, "Indian Oil Corporation", "/company/IOC/consolidated/"),
	(3, "Life Insurance Corporation of India (LIC)", "/company/LICI/consolidated/"),
	(4, "Oil and Natural Gas Corporation (ONGC)", "/company/ONGC/consolidated/"),
	(5, "State Bank of India (SBI)", "/company/SBIN/consolidated/"),
	(6, "Tata Motors", "/company/TATAMOTORS/consolidated/"),
	(7, "Tata Steel", "/company/TATASTEEL/consolidated/"),
	(8, "Tata Consultancy Services (TCS)", "/company/TCS/consolidated/"),
	(9, "HDFC Bank", "/company/HDFCBANK/consolidated/"),
	(10, "Infosys", "/company/INFY/consolidated/"),
];

/// Companies suggested while the search input is empty.
#[must_use]
pub fn recommended_companies() -> Vec<SearchableEntity> {
	RECOMMENDED
		.iter()
		.map(|&(id, name, url)| SearchableEntity::named(name).with_id(id).with_url(url))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recommendations_have_unique_identities() {
		let companies = recommended_companies();
		assert_eq!(companies.len(), 10);
		for (index, company) in companies.iter().enumerate() {
			assert!(
				companies[index + 1..]
					.iter()
					.all(|other| !other.same_identity(company)),
				"duplicate identity for {}",
				company.name
			);
		}
	}
}
