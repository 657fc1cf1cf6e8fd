use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 产品标识字段名
pub const ID_FIELD: &str = "_id";

/// 请求体中的产品字段
///
/// 结构完全由调用方决定，处理器不做任何校验。
pub type ProductDraft = Map<String, Value>;

/// 产品实体
///
/// 除标识外的所有字段都保存在 `fields` 中，序列化时与 `_id` 平铺在同一层级。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 产品唯一标识，由存储层分配
    #[serde(rename = "_id")]
    pub id: String,

    /// 调用方定义的字段
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// 用存储层分配的标识和请求体创建产品
    ///
    /// 请求体中携带的 `_id` 会被忽略。
    pub fn from_draft(id: impl Into<String>, mut draft: ProductDraft) -> Self {
        draft.remove(ID_FIELD);
        Self {
            id: id.into(),
            fields: draft,
        }
    }

    /// 获取字段值
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// 产品名称
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// 产品描述
    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    /// 用请求体中的字段覆盖现有字段，未出现的字段保持不变，标识不可修改
    pub fn apply(&mut self, draft: ProductDraft) {
        for (key, value) in draft {
            if key != ID_FIELD {
                self.fields.insert(key, value);
            }
        }
    }

    /// 判断产品是否包含 `expected` 中的全部字段且值相等
    pub fn matches(&self, expected: &Map<String, Value>) -> bool {
        expected.iter().all(|(key, value)| {
            if key == ID_FIELD {
                value.as_str() == Some(self.id.as_str())
            } else {
                self.fields.get(key) == Some(value)
            }
        })
    }
}
