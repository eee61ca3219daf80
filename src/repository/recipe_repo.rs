// ==========================================
// 配方导入系统 - 配方仓储 Trait
// ==========================================
// 职责: 定义配方落库接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::recipe::{Recipe, RecipeImportRequest, RecipeMaterial};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// RecipeStore Trait
// ==========================================
// 用途: 导入流程的落库协作者
// 实现者: SqliteRecipeRepository（使用 rusqlite）
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// 创建配方（配方 + 物料明细，单条请求内原子）
    ///
    /// # 参数
    /// - request: 配方创建请求
    ///
    /// # 返回
    /// - Ok(Recipe): 落库后的配方
    /// - Err(DuplicateCode): request.code 非空且已存在
    ///
    /// # 说明
    /// - request.code 为空时自动生成编码
    async fn add_recipe(&self, request: &RecipeImportRequest) -> RepositoryResult<Recipe>;

    /// 按编码查询配方
    async fn get_recipe_by_code(&self, code: &str) -> RepositoryResult<Option<Recipe>>;

    /// 查询配方物料明细（按投料顺序）
    async fn list_materials(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeMaterial>>;

    /// 统计配方数量
    async fn count_recipes(&self) -> RepositoryResult<usize>;
}

#[async_trait]
impl<T: RecipeStore + ?Sized> RecipeStore for Arc<T> {
    async fn add_recipe(&self, request: &RecipeImportRequest) -> RepositoryResult<Recipe> {
        (**self).add_recipe(request).await
    }

    async fn get_recipe_by_code(&self, code: &str) -> RepositoryResult<Option<Recipe>> {
        (**self).get_recipe_by_code(code).await
    }

    async fn list_materials(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeMaterial>> {
        (**self).list_materials(recipe_id).await
    }

    async fn count_recipes(&self) -> RepositoryResult<usize> {
        (**self).count_recipes().await
    }
}
