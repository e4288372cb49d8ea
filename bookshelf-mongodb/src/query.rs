//! Query translation from the bookshelf filter AST to MongoDB query syntax.

use bson::{Bson, Document, doc};

use bookshelf_core::{
    error::StoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates filter expressions into MongoDB query documents.
///
/// `Contains` becomes a case-insensitive `$regex` over the escaped needle, so
/// user-supplied search text is always matched literally.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    pub fn translate(expr: &Expr) -> Result<Document, StoreError> {
        MongoQueryTranslator.visit_expr(expr)
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    // `$not` only applies to operator expressions, so whole sub-queries are negated with `$nor`.
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$nor": [self.visit_expr(expr)?],
        })
    }

    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
                FieldOp::Contains => match value {
                    Bson::String(needle) => doc! { "$regex": regex::escape(needle), "$options": "i" },
                    _ => return Err(StoreError::Backend("Contains operator requires a string value".to_string())),
                },
            }
        })
    }
}
