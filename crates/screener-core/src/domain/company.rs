//! 회사 식별 정보 및 유니버스.

use serde::{Deserialize, Serialize};

/// 회사 식별 정보.
///
/// Identity Resolver가 부여하는 불변 데이터입니다. 코어는 읽기만 하며,
/// `id`가 저장소와 가격 매핑의 키로 쓰입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// 내부 식별자
    pub id: String,
    /// 표시용 회사명
    pub name: String,
    /// 거래 심볼 (시세 조회용, 없을 수 있음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Company {
    /// 새 회사 정보 생성.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: None,
        }
    }

    /// 거래 심볼을 지정합니다.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// 스크리닝 대상 회사 목록.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Universe {
    companies: Vec<Company>,
}

impl Universe {
    /// 회사 목록으로 유니버스를 생성합니다.
    pub fn new(companies: Vec<Company>) -> Self {
        Self { companies }
    }

    /// 회사 수.
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// 회사 순회.
    pub fn iter(&self) -> impl Iterator<Item = &Company> {
        self.companies.iter()
    }

    /// 전체 식별자 목록.
    pub fn ids(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.id.clone()).collect()
    }

    /// 식별자로 회사 조회.
    pub fn get(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// 식별자로 표시용 회사명 조회. 없으면 식별자를 그대로 반환합니다.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}
